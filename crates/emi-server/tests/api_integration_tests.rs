//! Integration tests for the EMI server endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use emi_server::routes::create_router;
use emi_server::{bind_listener, ServerConfig, ServerError};

fn app() -> Router {
    create_router(ServerConfig::default())
}

async fn post_calculate(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ===========================================================================
// /calculate
// ===========================================================================

#[tokio::test]
async fn test_calculate_reference_loan() {
    let (status, body) = post_calculate(
        app(),
        r#"{"loan_amount": 100000, "interest_rate": 10, "loan_tenure": 12}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "monthly_emi": 8791.59,
            "total_amount_payable": 105499.05,
            "total_interest": 5499.05
        })
    );
}

#[tokio::test]
async fn test_calculate_interest_free_loan() {
    let (status, body) = post_calculate(
        app(),
        r#"{"loan_amount": "50000", "interest_rate": 0, "loan_tenure": "10"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["monthly_emi"], json!(5000.0));
    assert_eq!(body["total_amount_payable"], json!(50000.0));
    assert_eq!(body["total_interest"], json!(0.0));
}

#[tokio::test]
async fn test_calculate_zero_principal() {
    let (status, body) = post_calculate(
        app(),
        r#"{"loan_amount": 0, "interest_rate": 10, "loan_tenure": 12}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "monthly_emi": 0.0, "total_amount_payable": 0.0, "total_interest": 0.0 })
    );
}

#[tokio::test]
async fn test_calculate_zero_tenure() {
    let (status, body) = post_calculate(
        app(),
        r#"{"loan_amount": 100000, "interest_rate": 10, "loan_tenure": 0}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["monthly_emi"], json!(0.0));
}

#[tokio::test]
async fn test_calculate_missing_fields_default_to_zero() {
    let (status, body) = post_calculate(app(), "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_amount_payable"], json!(0.0));
}

#[tokio::test]
async fn test_calculate_non_numeric_tenure() {
    let (status, body) = post_calculate(
        app(),
        r#"{"loan_amount": 100000, "interest_rate": 10, "loan_tenure": "abc"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input" }));
}

#[tokio::test]
async fn test_calculate_malformed_json() {
    let (status, body) = post_calculate(app(), "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
}

#[tokio::test]
async fn test_calculate_non_object_body() {
    let (status, _) = post_calculate(app(), "[100000, 10, 12]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calculate_falsy_and_boolean_bodies_are_bad_requests() {
    for body in ["", "[]", "0", "false", "\"\"", r#"{"loan_amount": true, "loan_tenure": 12}"#] {
        let (status, json) = post_calculate(app(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(json, json!({ "error": "Invalid input" }));
    }
}

#[tokio::test]
async fn test_calculate_half_cent_interest_tie() {
    let (status, body) = post_calculate(
        app(),
        r#"{"loan_amount": 105, "interest_rate": 19.6, "loan_tenure": 1}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "monthly_emi": 106.72, "total_amount_payable": 106.72, "total_interest": 1.72 })
    );
}

#[tokio::test]
async fn test_calculate_tenure_above_limit() {
    let config = ServerConfig {
        max_tenure_months: 360,
        ..ServerConfig::default()
    };
    let (status, _) = post_calculate(
        create_router(config.clone()),
        r#"{"loan_amount": 100000, "interest_rate": 10, "loan_tenure": 361}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_calculate(
        create_router(config),
        r#"{"loan_amount": 100000, "interest_rate": 10, "loan_tenure": 360}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_calculate_ignores_content_type() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("content-type", "text/plain")
                .body(Body::from(r#"{"loan_amount": 1000, "interest_rate": 12, "loan_tenure": 3}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["monthly_emi"], json!(340.02));
    assert_eq!(body["total_amount_payable"], json!(1020.07));
}

#[tokio::test]
async fn test_calculate_rejects_get() {
    let response = app()
        .oneshot(Request::builder().uri("/calculate").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ===========================================================================
// /health
// ===========================================================================

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

// ===========================================================================
// Port selection
// ===========================================================================

#[tokio::test]
async fn test_bind_falls_back_when_port_taken() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        port_fallback: true,
        fallback_port_end: port.saturating_add(50),
        ..ServerConfig::default()
    };

    let listener = bind_listener(&config).await.unwrap();
    let bound = listener.local_addr().unwrap().port();
    assert_ne!(bound, port);
    assert!(bound > port && bound < config.fallback_port_end);
}

#[tokio::test]
async fn test_bind_without_fallback_reports_port_in_use() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        port_fallback: false,
        ..ServerConfig::default()
    };

    match bind_listener(&config).await {
        Err(ServerError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::AddrInUse),
        other => panic!("expected AddrInUse, got {:?}", other.map(|l| l.local_addr())),
    }
}

#[tokio::test]
async fn test_bind_rejects_bad_host() {
    let config = ServerConfig {
        host: "not-an-ip".to_string(),
        ..ServerConfig::default()
    };
    assert!(matches!(
        bind_listener(&config).await,
        Err(ServerError::InvalidHost(_))
    ));
}
