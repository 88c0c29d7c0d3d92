//! Traffic congestion and risk scoring.
//!
//! [`RiskScorer`] folds traffic, weather, safety and environment readings into
//! a weighted raw score, normalizes it to a 0-100 congestion percentage and
//! bands the result. The constants live in a [`ScoringPolicy`].

pub mod advisory;
pub mod api;
pub mod config;
pub mod error;
pub mod policy;
pub mod readings;
pub mod scorer;

pub use advisory::Advisory;
pub use error::ScoreError;
pub use policy::{Normalization, PenaltyAttribution, PolicyVariant, ScoringPolicy, WeatherTable};
pub use readings::{
    EnvironmentReading, SafetyReading, TimeOfDay, TrafficReading, WeatherCondition, WeatherReading,
};
pub use scorer::{Band, Breakdown, FactorGroup, RiskScorer, ScoreResult};
