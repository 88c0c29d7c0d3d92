use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::advisory::Advisory;
use crate::error::ScoreError;
use crate::policy::ScoringPolicy;
use crate::readings::{
    parse_flag, EnvironmentReading, SafetyReading, TrafficReading, WeatherReading,
};
use crate::scorer::{FactorGroup, RiskScorer, ScoreResult};

/// The scorer every request evaluates against.
pub struct AppState {
    pub scorer: RiskScorer,
}

pub fn router(scorer: RiskScorer) -> Router {
    // Allows a local HTML form to talk to this API
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/evaluate", post(evaluate))
        .route("/policy", get(policy))
        .layer(cors)
        .with_state(Arc::new(AppState { scorer }))
}

// --- API DTOs ---

/// A yes/no selection, sent either as a JSON bool or as the form's "Yes"/"No".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn resolve(&self, field: &'static str) -> Result<bool, ScoreError> {
        match self {
            Flag::Bool(b) => Ok(*b),
            Flag::Text(s) => parse_flag(field, s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficInput {
    pub density: f64,
    pub average_speed: f64,
    pub peak_hour: Flag,
    pub construction: Flag,
    pub accident_reported: Flag,
    pub lane_closure: Flag,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherInput {
    pub condition: String,
    pub visibility_meters: f64,
    pub temperature_c: f64,
    pub humidity_percent: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SafetyInput {
    pub helmet_usage_percent: f64,
    pub seatbelt_usage_percent: f64,
    pub speeding_observed: Flag,
    pub time_of_day: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateRequest {
    pub traffic: TrafficInput,
    pub weather: WeatherInput,
    pub safety: SafetyInput,
    pub environment: EnvironmentReading,
}

impl EvaluateRequest {
    /// Resolves every categorical field; the first unmapped value is reported.
    pub fn into_readings(
        self,
    ) -> Result<(TrafficReading, WeatherReading, SafetyReading, EnvironmentReading), ScoreError>
    {
        let traffic = TrafficReading {
            density: self.traffic.density,
            average_speed: self.traffic.average_speed,
            peak_hour: self.traffic.peak_hour.resolve("peak hour")?,
            construction: self.traffic.construction.resolve("construction")?,
            accident_reported: self.traffic.accident_reported.resolve("accident reported")?,
            lane_closure: self.traffic.lane_closure.resolve("lane closure")?,
        };
        let weather = WeatherReading {
            condition: self.weather.condition.parse()?,
            visibility_meters: self.weather.visibility_meters,
            temperature_c: self.weather.temperature_c,
            humidity_percent: self.weather.humidity_percent,
        };
        let safety = SafetyReading {
            helmet_usage_percent: self.safety.helmet_usage_percent,
            seatbelt_usage_percent: self.safety.seatbelt_usage_percent,
            speeding_observed: self.safety.speeding_observed.resolve("speeding observed")?,
            time_of_day: self.safety.time_of_day.parse()?,
        };
        Ok((traffic, weather, safety, self.environment))
    }
}

#[derive(Debug, Serialize)]
pub struct FactorContribution {
    pub group: FactorGroup,
    pub score: i64,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub result: ScoreResult,
    pub verdict: &'static str,
    /// Subtotals truncated to whole points for display.
    pub contributions: Vec<FactorContribution>,
    pub advisory: &'static Advisory,
}

impl EvaluateResponse {
    pub fn new(result: ScoreResult) -> Self {
        let contributions = result
            .breakdown
            .iter()
            .map(|(group, score)| FactorContribution { group, score: score.trunc() as i64 })
            .collect();

        Self {
            verdict: result.band.label(),
            advisory: Advisory::for_band(result.band),
            contributions,
            result,
        }
    }
}

// --- Errors ---

pub struct AppError(ScoreError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ScoreError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ScoreError::InvalidPolicy(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        Self(err)
    }
}

// --- Handlers ---

async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let (traffic, weather, safety, environment) = payload.into_readings().map_err(|err| {
        tracing::warn!(%err, "rejected evaluation request");
        err
    })?;

    let result = state.scorer.evaluate(&traffic, &weather, &safety, &environment);
    Ok(Json(EvaluateResponse::new(result)))
}

async fn policy(State(state): State<Arc<AppState>>) -> Json<ScoringPolicy> {
    Json(*state.scorer.policy())
}
