//! Tunable constants for the risk formula.
//!
//! Every number the scorer uses lives in [`ScoringPolicy`]. The three presets
//! reproduce the deployed variants of the congestion form, which only differ
//! in their weights, the normalization divisor and which subtotal absorbs the
//! heat and humidity penalties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoreError;
use crate::readings::WeatherCondition;
use crate::scorer::Band;

/// Additive penalty for each weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherTable {
    pub clear: f64,
    pub rain: f64,
    pub fog: f64,
    pub storm: f64,
    pub extreme_heat: f64,
    pub flooding: f64,
}

impl WeatherTable {
    pub fn lookup(&self, condition: WeatherCondition) -> f64 {
        match condition {
            WeatherCondition::Clear => self.clear,
            WeatherCondition::Rain => self.rain,
            WeatherCondition::Fog => self.fog,
            WeatherCondition::Storm => self.storm,
            WeatherCondition::ExtremeHeat => self.extreme_heat,
            WeatherCondition::Flooding => self.flooding,
        }
    }
}

/// Which factor group the temperature and humidity penalties count towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyAttribution {
    Weather,
    Environment,
}

/// How the raw score becomes a congestion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Normalization {
    /// `min(100, floor(raw / divisor * 100))`
    Percentage { divisor: f64 },
    /// The raw score is read directly as the percentage, capped at 100.
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    // traffic
    pub density_weight: f64,
    pub speed_floor: f64,
    pub speed_weight: f64,
    pub peak_hour_penalty: f64,
    pub construction_penalty: f64,
    pub accident_penalty: f64,
    pub lane_closure_penalty: f64,

    // weather
    pub weather_table: WeatherTable,
    pub low_visibility_meters: f64,
    pub low_visibility_penalty: f64,
    pub heat_threshold_c: f64,
    pub heat_penalty: f64,
    pub humidity_threshold_percent: f64,
    pub humidity_penalty: f64,
    pub heat_humidity_attribution: PenaltyAttribution,

    // safety
    pub helmet_weight: f64,
    pub seatbelt_weight: f64,
    pub speeding_penalty: f64,
    pub night_penalty: f64,

    // environment
    pub aqi_threshold: f64,
    pub aqi_penalty: f64,

    pub normalization: Normalization,
    /// Values strictly below this are `Low`.
    pub low_threshold: f64,
    /// Values strictly below this (and not `Low`) are `Moderate`.
    pub high_threshold: f64,
}

impl ScoringPolicy {
    /// Canonical constants, normalized against 160.
    pub fn congestiq() -> Self {
        Self {
            density_weight: 0.4,
            speed_floor: 60.0,
            speed_weight: 0.35,
            peak_hour_penalty: 10.0,
            construction_penalty: 15.0,
            accident_penalty: 20.0,
            lane_closure_penalty: 10.0,

            weather_table: WeatherTable {
                clear: 0.0,
                rain: 12.0,
                fog: 18.0,
                storm: 25.0,
                extreme_heat: 10.0,
                flooding: 30.0,
            },
            low_visibility_meters: 300.0,
            low_visibility_penalty: 12.0,
            heat_threshold_c: 40.0,
            heat_penalty: 8.0,
            humidity_threshold_percent: 80.0,
            humidity_penalty: 6.0,
            heat_humidity_attribution: PenaltyAttribution::Weather,

            helmet_weight: 0.25,
            seatbelt_weight: 0.2,
            speeding_penalty: 15.0,
            night_penalty: 8.0,

            aqi_threshold: 200.0,
            aqi_penalty: 12.0,

            normalization: Normalization::Percentage { divisor: 160.0 },
            low_threshold: 35.0,
            high_threshold: 65.0,
        }
    }

    /// Lighter weather table, heat and humidity counted as environment stress.
    pub fn split_environment() -> Self {
        Self {
            weather_table: WeatherTable {
                clear: 0.0,
                rain: 10.0,
                fog: 15.0,
                storm: 20.0,
                extreme_heat: 8.0,
                flooding: 25.0,
            },
            heat_humidity_attribution: PenaltyAttribution::Environment,
            aqi_penalty: 10.0,
            normalization: Normalization::Percentage { divisor: 150.0 },
            ..Self::congestiq()
        }
    }

    /// Bands read straight off the raw score, on a 30/60 scale.
    pub fn raw_score() -> Self {
        Self {
            normalization: Normalization::Raw,
            low_threshold: 30.0,
            high_threshold: 60.0,
            ..Self::congestiq()
        }
    }

    pub fn band_for(&self, value: f64) -> Band {
        if value < self.low_threshold {
            Band::Low
        } else if value < self.high_threshold {
            Band::Moderate
        } else {
            Band::High
        }
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        if let Normalization::Percentage { divisor } = self.normalization {
            if !(divisor > 0.0 && divisor.is_finite()) {
                return Err(ScoreError::InvalidPolicy(format!(
                    "normalization divisor must be positive, got {divisor}"
                )));
            }
        }
        if !(0.0 < self.low_threshold && self.low_threshold < self.high_threshold) {
            return Err(ScoreError::InvalidPolicy(format!(
                "band thresholds must satisfy 0 < low < high, got {} / {}",
                self.low_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::congestiq()
    }
}

/// Named presets, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyVariant {
    #[default]
    Congestiq,
    SplitEnvironment,
    RawScore,
}

impl PolicyVariant {
    pub fn policy(self) -> ScoringPolicy {
        match self {
            PolicyVariant::Congestiq => ScoringPolicy::congestiq(),
            PolicyVariant::SplitEnvironment => ScoringPolicy::split_environment(),
            PolicyVariant::RawScore => ScoringPolicy::raw_score(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyVariant::Congestiq => "congestiq",
            PolicyVariant::SplitEnvironment => "split-environment",
            PolicyVariant::RawScore => "raw-score",
        }
    }
}

impl fmt::Display for PolicyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyVariant {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "congestiq" | "default" => Ok(PolicyVariant::Congestiq),
            "split-environment" => Ok(PolicyVariant::SplitEnvironment),
            "raw-score" | "raw" => Ok(PolicyVariant::RawScore),
            _ => Err(ScoreError::invalid_input("policy variant", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for variant in [
            PolicyVariant::Congestiq,
            PolicyVariant::SplitEnvironment,
            PolicyVariant::RawScore,
        ] {
            assert!(variant.policy().validate().is_ok(), "{variant}");
            assert_eq!(variant.as_str().parse::<PolicyVariant>(), Ok(variant));
        }
    }

    #[test]
    fn band_edges_are_strict() {
        let policy = ScoringPolicy::congestiq();
        assert_eq!(policy.band_for(34.0), Band::Low);
        assert_eq!(policy.band_for(35.0), Band::Moderate);
        assert_eq!(policy.band_for(64.0), Band::Moderate);
        assert_eq!(policy.band_for(65.0), Band::High);

        let raw = ScoringPolicy::raw_score();
        assert_eq!(raw.band_for(29.0), Band::Low);
        assert_eq!(raw.band_for(30.0), Band::Moderate);
        assert_eq!(raw.band_for(60.0), Band::High);
    }

    #[test]
    fn rejects_broken_policies() {
        let zero_divisor = ScoringPolicy {
            normalization: Normalization::Percentage { divisor: 0.0 },
            ..ScoringPolicy::congestiq()
        };
        assert!(matches!(zero_divisor.validate(), Err(ScoreError::InvalidPolicy(_))));

        let inverted = ScoringPolicy {
            low_threshold: 70.0,
            high_threshold: 40.0,
            ..ScoringPolicy::congestiq()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn weather_table_lookup() {
        let table = ScoringPolicy::congestiq().weather_table;
        assert_eq!(table.lookup(WeatherCondition::Clear), 0.0);
        assert_eq!(table.lookup(WeatherCondition::Flooding), 30.0);
        assert_eq!(
            ScoringPolicy::split_environment().weather_table.lookup(WeatherCondition::Storm),
            20.0
        );
    }
}
