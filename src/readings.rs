use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoreError;

// Percent fields arrive pre-clamped to [0, 100] from whatever collected them.
// Nothing in here re-validates ranges.

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrafficReading {
    pub density: f64,       // percent
    pub average_speed: f64, // km/h
    pub peak_hour: bool,
    pub construction: bool,
    pub accident_reported: bool,
    pub lane_closure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Rain,
    Fog,
    Storm,
    ExtremeHeat,
    Flooding,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 6] = [
        WeatherCondition::Clear,
        WeatherCondition::Rain,
        WeatherCondition::Fog,
        WeatherCondition::Storm,
        WeatherCondition::ExtremeHeat,
        WeatherCondition::Flooding,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Storm => "Storm",
            WeatherCondition::ExtremeHeat => "Extreme Heat",
            WeatherCondition::Flooding => "Flooding",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeatherCondition {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "Extreme Heat", "ExtremeHeat" and "extreme_heat" all collapse to the same key
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "clear" => Ok(WeatherCondition::Clear),
            "rain" => Ok(WeatherCondition::Rain),
            "fog" => Ok(WeatherCondition::Fog),
            "storm" => Ok(WeatherCondition::Storm),
            "extremeheat" => Ok(WeatherCondition::ExtremeHeat),
            "flooding" => Ok(WeatherCondition::Flooding),
            _ => Err(ScoreError::invalid_input("weather condition", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub condition: WeatherCondition,
    pub visibility_meters: f64,
    pub temperature_c: f64,
    pub humidity_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl FromStr for TimeOfDay {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeOfDay::Day),
            "night" => Ok(TimeOfDay::Night),
            _ => Err(ScoreError::invalid_input("time of day", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SafetyReading {
    pub helmet_usage_percent: f64,
    pub seatbelt_usage_percent: f64,
    pub speeding_observed: bool,
    pub time_of_day: TimeOfDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentReading {
    pub air_quality_index: f64,
}

/// Maps a form selection ("Yes"/"No", or "true"/"false") to a flag.
pub fn parse_flag(field: &'static str, value: &str) -> Result<bool, ScoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        _ => Err(ScoreError::invalid_input(field, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_labels_parse_back() {
        for condition in WeatherCondition::ALL {
            assert_eq!(condition.label().parse::<WeatherCondition>(), Ok(condition));
        }
        assert_eq!("extreme_heat".parse(), Ok(WeatherCondition::ExtremeHeat));
        assert_eq!("  FOG ".parse(), Ok(WeatherCondition::Fog));
    }

    #[test]
    fn unknown_weather_is_rejected() {
        let err = "Hail".parse::<WeatherCondition>().unwrap_err();
        assert_eq!(err, ScoreError::invalid_input("weather condition", "Hail"));
        assert!("".parse::<WeatherCondition>().is_err());
    }

    #[test]
    fn time_of_day_parses() {
        assert_eq!("Night".parse(), Ok(TimeOfDay::Night));
        assert_eq!("day".parse(), Ok(TimeOfDay::Day));
        assert!("Dusk".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn flags_accept_form_values() {
        assert_eq!(parse_flag("peak hour", "Yes"), Ok(true));
        assert_eq!(parse_flag("peak hour", "No"), Ok(false));
        assert_eq!(parse_flag("peak hour", "true"), Ok(true));
        assert!(parse_flag("peak hour", "maybe").is_err());
    }
}
