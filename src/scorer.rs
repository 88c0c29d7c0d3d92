use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::{Normalization, PenaltyAttribution, ScoringPolicy};
use crate::readings::{
    EnvironmentReading, SafetyReading, TimeOfDay, TrafficReading, WeatherReading,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Moderate,
    High,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Moderate => "moderate",
            Band::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::Low => "Low Congestion",
            Band::Moderate => "Moderate Congestion",
            Band::High => "High Congestion",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorGroup {
    Traffic,
    Weather,
    Safety,
    Environment,
}

impl FactorGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorGroup::Traffic => "traffic",
            FactorGroup::Weather => "weather",
            FactorGroup::Safety => "safety",
            FactorGroup::Environment => "environment",
        }
    }
}

/// Portion of the raw score attributable to each factor group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub traffic: f64,
    pub weather: f64,
    pub safety: f64,
    pub environment: f64,
}

impl Breakdown {
    pub fn get(&self, group: FactorGroup) -> f64 {
        match group {
            FactorGroup::Traffic => self.traffic,
            FactorGroup::Weather => self.weather,
            FactorGroup::Safety => self.safety,
            FactorGroup::Environment => self.environment,
        }
    }

    /// Groups in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorGroup, f64)> + '_ {
        [
            FactorGroup::Traffic,
            FactorGroup::Weather,
            FactorGroup::Safety,
            FactorGroup::Environment,
        ]
        .into_iter()
        .map(move |group| (group, self.get(group)))
    }

    pub fn total(&self) -> f64 {
        self.traffic + self.weather + self.safety + self.environment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub raw_score: f64,
    pub congestion_percentage: i32,
    pub band: Band,
    pub breakdown: Breakdown,
}

/// Stateless evaluator over a fixed [`ScoringPolicy`].
///
/// Inputs are assumed to be inside their documented ranges. Out of range
/// values are not rejected; they flow through the same arithmetic and may
/// yield a raw score outside the usual scale.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    policy: ScoringPolicy,
}

impl RiskScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn evaluate(
        &self,
        traffic: &TrafficReading,
        weather: &WeatherReading,
        safety: &SafetyReading,
        environment: &EnvironmentReading,
    ) -> ScoreResult {
        let p = &self.policy;

        let mut breakdown = Breakdown {
            traffic: self.traffic_risk(traffic),
            weather: self.weather_risk(weather),
            safety: self.safety_risk(safety),
            environment: if environment.air_quality_index > p.aqi_threshold {
                p.aqi_penalty
            } else {
                0.0
            },
        };

        let stress = self.heat_humidity_risk(weather);
        match p.heat_humidity_attribution {
            PenaltyAttribution::Weather => breakdown.weather += stress,
            PenaltyAttribution::Environment => breakdown.environment += stress,
        }

        let raw_score = breakdown.total();
        let scaled = match p.normalization {
            Normalization::Percentage { divisor } => raw_score / divisor * 100.0,
            Normalization::Raw => raw_score,
        };
        let congestion_percentage = (scaled.floor() as i32).min(100);
        let band = p.band_for(congestion_percentage as f64);

        tracing::debug!(
            raw_score,
            congestion_percentage,
            band = band.as_str(),
            "evaluated congestion risk"
        );

        ScoreResult { raw_score, congestion_percentage, band, breakdown }
    }

    fn traffic_risk(&self, traffic: &TrafficReading) -> f64 {
        let p = &self.policy;
        let mut risk = traffic.density * p.density_weight;
        risk += (p.speed_floor - traffic.average_speed).max(0.0) * p.speed_weight;

        for (flag, penalty) in [
            (traffic.peak_hour, p.peak_hour_penalty),
            (traffic.construction, p.construction_penalty),
            (traffic.accident_reported, p.accident_penalty),
            (traffic.lane_closure, p.lane_closure_penalty),
        ] {
            if flag {
                risk += penalty;
            }
        }
        risk
    }

    fn weather_risk(&self, weather: &WeatherReading) -> f64 {
        let p = &self.policy;
        let mut risk = p.weather_table.lookup(weather.condition);
        if weather.visibility_meters < p.low_visibility_meters {
            risk += p.low_visibility_penalty;
        }
        risk
    }

    fn heat_humidity_risk(&self, weather: &WeatherReading) -> f64 {
        let p = &self.policy;
        let mut risk = 0.0;
        if weather.temperature_c > p.heat_threshold_c {
            risk += p.heat_penalty;
        }
        if weather.humidity_percent > p.humidity_threshold_percent {
            risk += p.humidity_penalty;
        }
        risk
    }

    fn safety_risk(&self, safety: &SafetyReading) -> f64 {
        let p = &self.policy;
        let mut risk = (100.0 - safety.helmet_usage_percent) * p.helmet_weight;
        risk += (100.0 - safety.seatbelt_usage_percent) * p.seatbelt_weight;
        if safety.speeding_observed {
            risk += p.speeding_penalty;
        }
        if safety.time_of_day == TimeOfDay::Night {
            risk += p.night_penalty;
        }
        risk
    }
}
