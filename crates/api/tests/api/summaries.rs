use crate::helpers::{spawn_app, MockClimateAccess};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use hyper::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use time::macros::date;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Seeded scenario: observations ("2016-08-22", 70.0), ("2016-08-23", 75.0),
/// ("2016-08-24", 80.0); querying from 2016-08-23 summarizes the last two
#[tokio::test]
async fn start_summary_returns_min_max_and_mean() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_readings()
        .withf(|query| query.start == date!(2016 - 08 - 23) && query.end.is_none())
        .times(1)
        .returning(|_| Ok(vec![75.0, 80.0]));

    let test_app = spawn_app(Arc::new(climate_db));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2016-08-23")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"TMIN": 75.0, "TMAX": 80.0, "TAVG": 77.5})
    );
}

#[tokio::test]
async fn start_summary_bounds_hold_for_unordered_readings() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_readings()
        .times(1)
        .returning(|_| Ok(vec![75.0, 61.0, 68.0]));

    let test_app = spawn_app(Arc::new(climate_db));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2017-01-01")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);

    let payload = body_json(response).await;
    let tmin = payload["TMIN"].as_f64().unwrap();
    let tavg = payload["TAVG"].as_f64().unwrap();
    let tmax = payload["TMAX"].as_f64().unwrap();
    assert!(tmin <= tavg && tavg <= tmax);
    assert_eq!(payload, json!({"TMIN": 61.0, "TMAX": 75.0, "TAVG": 68.0}));
}

/// A start date past the dataset produces the (historically imprecise)
/// out-of-range error
#[tokio::test]
async fn start_summary_is_not_found_past_the_dataset() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_readings()
        .withf(|query| query.start == date!(2016 - 08 - 25) && query.end.is_none())
        .times(1)
        .returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(climate_db));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2016-08-25")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"error": "start date is past the maximum date in the dataset"})
    );
}

/// Malformed dates never reach the store; MockClimateAccess has no
/// expectations set, so any query would panic the test
#[tokio::test]
async fn start_summary_rejects_malformed_dates() {
    for uri in [
        "/api/v1.0/not-a-date",
        "/api/v1.0/2016-8-23",
        "/api/v1.0/2016%2F08%2F23",
    ] {
        let test_app = spawn_app(Arc::new(MockClimateAccess::new()));

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = test_app
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "dates must be in %Y-%m-%d format"})
        );
    }
}

#[tokio::test]
async fn range_summary_queries_inclusive_bounds() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_readings()
        .withf(|query| {
            query.start == date!(2016 - 08 - 22) && query.end == Some(date!(2016 - 08 - 24))
        })
        .times(1)
        .returning(|_| Ok(vec![70.0, 75.0, 80.0]));

    let test_app = spawn_app(Arc::new(climate_db));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2016-08-22/2016-08-24")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"TMIN": 70.0, "TMAX": 80.0, "TAVG": 75.0})
    );
}

/// start > end is rejected before touching the store, regardless of data
#[tokio::test]
async fn range_summary_rejects_reversed_range() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new()));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2016-08-24/2016-08-22")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"error": "start date cannot be greater than end date"})
    );
}

#[tokio::test]
async fn range_summary_rejects_malformed_dates() {
    for uri in [
        "/api/v1.0/not-a-date/2016-08-24",
        "/api/v1.0/2016-08-22/not-a-date",
    ] {
        let test_app = spawn_app(Arc::new(MockClimateAccess::new()));

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = test_app
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "dates must be in %Y-%m-%d format"})
        );
    }
}

#[tokio::test]
async fn range_summary_is_not_found_when_no_rows_match() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_readings()
        .times(1)
        .returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(climate_db));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2018-01-01/2018-02-01")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"error": "chosen date is past the maximum date in the dataset"})
    );
}
