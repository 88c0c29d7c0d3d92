//! Drives the HTTP surface end to end without binding a socket.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use congestiq::{api, RiskScorer, ScoringPolicy};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    api::router(RiskScorer::default())
}

fn form(weather: &str, accident: Value) -> Value {
    json!({
        "traffic": {
            "density": 50,
            "average_speed": 40,
            "peak_hour": "No",
            "construction": "No",
            "accident_reported": accident,
            "lane_closure": false
        },
        "weather": {
            "condition": weather,
            "visibility_meters": 500,
            "temperature_c": 30,
            "humidity_percent": 60
        },
        "safety": {
            "helmet_usage_percent": 70,
            "seatbelt_usage_percent": 80,
            "speeding_observed": "No",
            "time_of_day": "Day"
        },
        "environment": { "air_quality_index": 120 }
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_evaluate(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/evaluate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn evaluates_the_default_form() {
    let (status, body) = send(app(), post_evaluate(&form("Clear", json!("No")))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["congestion_percentage"], 24);
    assert_eq!(body["result"]["band"], "low");
    assert_eq!(body["verdict"], "Low Congestion");
    assert_eq!(body["contributions"][0]["group"], "traffic");
    assert_eq!(body["contributions"][0]["score"], 27);
    assert_eq!(body["contributions"][2]["score"], 11);
    assert_eq!(body["advisory"]["actions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn accepts_display_labels_and_bool_flags() {
    let (status, body) = send(app(), post_evaluate(&form("Extreme Heat", json!(true)))).await;

    assert_eq!(status, StatusCode::OK);
    // 38.5 + 10 heat + 20 accident = 68.5 -> 42
    assert_eq!(body["result"]["congestion_percentage"], 42);
    assert_eq!(body["result"]["band"], "moderate");
    assert_eq!(body["contributions"][1]["score"], 10);
}

#[tokio::test]
async fn unmapped_weather_is_rejected() {
    let (status, body) = send(app(), post_evaluate(&form("Hail", json!("No")))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Hail"));
}

#[tokio::test]
async fn unmapped_flag_is_rejected() {
    let (status, _) = send(app(), post_evaluate(&form("Rain", json!("Perhaps")))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn exposes_active_policy() {
    let app = api::router(RiskScorer::new(ScoringPolicy::split_environment()));
    let (status, body) = send(
        app,
        Request::builder().uri("/policy").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["normalization"]["kind"], "percentage");
    assert_eq!(body["normalization"]["divisor"], 150.0);
    assert_eq!(body["heat_humidity_attribution"], "environment");
    assert_eq!(body["weather_table"]["flooding"], 25.0);
}

#[tokio::test]
async fn misspelled_flag_is_rejected() {
    let mut body = form("Clear", json!("No"));
    let traffic = body["traffic"].as_object_mut().unwrap();
    traffic.remove("accident_reported");
    traffic.insert("accident".into(), json!("Yes"));

    let (status, _) = send(app(), post_evaluate(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_flag_is_rejected() {
    let mut body = form("Clear", json!("No"));
    body["safety"].as_object_mut().unwrap().remove("speeding_observed");

    let (status, _) = send(app(), post_evaluate(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_field_is_rejected() {
    let mut body = form("Clear", json!("No"));
    body["safety"]["speeding"] = json!("Yes");

    let (status, _) = send(app(), post_evaluate(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
