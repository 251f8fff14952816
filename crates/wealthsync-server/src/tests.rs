//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wealthsync_core::{InMemoryHistory, ReferenceData};

fn setup_test_app() -> (Router, Arc<InMemoryHistory>) {
    setup_test_app_with_config(ServerConfig::default())
}

fn setup_test_app_with_config(config: ServerConfig) -> (Router, Arc<InMemoryHistory>) {
    let reference = Arc::new(ReferenceData::embedded().unwrap());
    let history = Arc::new(InMemoryHistory::new());
    let app = create_router(BudgetCalculator::new(reference), history.clone(), config);
    (app, history)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn approx(value: &serde_json::Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 1e-6
}

// ========== City API Tests ==========

#[tokio::test]
async fn test_list_cities() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let cities = json.as_array().unwrap();
    assert_eq!(cities.len(), 18);
    assert_eq!(cities[0], serde_json::json!({"name": "Mumbai", "state": "Maharashtra"}));
    assert!(cities.contains(&serde_json::json!({"name": "Lucknow", "state": "Uttar Pradesh"})));
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_calculate_budget() {
    let (app, history) = setup_test_app();

    let body = serde_json::json!({
        "email": "a@x.com",
        "income": 50000,
        "expenses": 20000,
        "savings_goal": 10000,
        "location": "delhi",
        "expense_categories": {"physiological": 15000, "safety": 5000}
    });

    let response = app.oneshot(post_json("/api/budget", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(approx(&json["savings"], 30000.0));
    assert!(approx(&json["adjusted_savings"], 25200.0));
    assert!(approx(&json["recommended_savings"], 10590.0));
    assert!(approx(&json["inflation"], 5.9));
    assert!(approx(&json["cost_of_living_index"], 62.0));
    assert_eq!(json["message"], "Great job! You're meeting your savings goal.");

    let recommendations = json["recommendations"].as_array().unwrap();
    assert!(recommendations[0]
        .as_str()
        .unwrap()
        .starts_with("Your physiological expenses (₹15000)"));
    assert_eq!(
        recommendations.last().unwrap(),
        "Consider investing in low-risk options like fixed deposits."
    );

    let categories = &json["expense_categories"];
    assert!(approx(&categories["physiological"], 15000.0));
    assert!(approx(&categories["safety"], 5000.0));
    assert!(approx(&categories["social"], 0.0));
    assert!(approx(&categories["esteem"], 0.0));
    assert!(approx(&categories["self_actualization"], 0.0));

    assert_eq!(history.len().unwrap(), 1);
}

#[tokio::test]
async fn test_calculate_budget_accepts_numeric_strings() {
    let (app, _) = setup_test_app();

    let body = serde_json::json!({
        "email": "a@x.com",
        "income": "1000",
        "expenses": "250.5",
        "savings_goal": "100",
        "location": "Jaipur"
    });

    let response = app.oneshot(post_json("/api/budget", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(approx(&json["savings"], 749.5));
    assert!(approx(&json["inflation"], 5.3));
    assert!(approx(&json["cost_of_living_index"], 49.5));
}

#[tokio::test]
async fn test_calculate_budget_rejects_non_numeric_income() {
    let (app, history) = setup_test_app();

    let body = serde_json::json!({
        "email": "a@x.com",
        "income": "plenty",
        "expenses": 100,
        "savings_goal": 10
    });

    let response = app.oneshot(post_json("/api/budget", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["field"], "income");
    assert!(json["error"].as_str().unwrap().contains("not a number"));
    assert!(history.is_empty().unwrap());
}

#[tokio::test]
async fn test_calculate_budget_rejects_missing_savings_goal() {
    let (app, history) = setup_test_app();

    let body = serde_json::json!({"email": "a@x.com", "income": 1000, "expenses": 100});

    let response = app.oneshot(post_json("/api/budget", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["field"], "savings_goal");
    assert!(history.is_empty().unwrap());
}

#[tokio::test]
async fn test_calculate_budget_rejects_overflowing_result() {
    let (app, history) = setup_test_app();

    let body = serde_json::json!({
        "email": "a@x.com",
        "income": 1.7e308,
        "expenses": -1.7e308,
        "savings_goal": 1.7e308,
        "location": "mumbai"
    });

    let response = app.oneshot(post_json("/api/budget", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["field"], "income");
    assert!(json["error"].as_str().unwrap().contains("result out of range"));
    assert!(history.is_empty().unwrap());
}

#[tokio::test]
async fn test_calculate_budget_rejects_invalid_json() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/budget")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid JSON");
}

// ========== History API Tests ==========

#[tokio::test]
async fn test_budget_history_filters_by_email() {
    let (app, _) = setup_test_app();

    for (email, income) in [("a@x.com", 1000), ("b@x.com", 2000), ("a@x.com", 3000)] {
        let body = serde_json::json!({
            "email": email,
            "income": income,
            "expenses": 500,
            "savings_goal": 100
        });
        let response = app
            .clone()
            .oneshot(post_json("/api/budget", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/budget/history",
            &serde_json::json!({"email": "a@x.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["id"], 1);
    assert_eq!(entries[0]["email"], "a@x.com");
    assert!(approx(&entries[0]["income"], 1000.0));
    assert!(approx(&entries[0]["expenses"], 500.0));
    assert!(approx(&entries[0]["savings"], 500.0));
    assert!(approx(&entries[0]["savings_goal"], 100.0));
    assert!(approx(&entries[0]["recommended_savings"], 105.0));
    assert_eq!(
        entries[0]["message"],
        "Great job! You're meeting your savings goal."
    );
    assert!(entries[0]["timestamp"].is_string());

    assert_eq!(entries[1]["id"], 3);
    assert!(approx(&entries[1]["income"], 3000.0));
}

#[tokio::test]
async fn test_budget_history_unknown_email_is_empty() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/budget/history",
            &serde_json::json!({"email": "nobody@x.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!([]));
}

// ========== CORS Tests ==========

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_cors_preflight_for_budget() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/budget")
                .header("origin", "https://wealthsync-frontend2.onrender.com")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "https://wealthsync-frontend2.onrender.com"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let (app, _) = setup_test_app_with_config(ServerConfig {
        allowed_origins: vec!["https://only.example.com".to_string()],
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_security_headers() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}

// ========== Configuration Tests ==========

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins("https://a.example.com/, http://localhost:3000,,"),
        vec![
            "https://a.example.com".to_string(),
            "http://localhost:3000".to_string()
        ]
    );
    assert!(parse_origins("").is_empty());
}

#[test]
fn test_default_config_allows_reference_origins() {
    let config = ServerConfig::default();
    assert_eq!(
        config.allowed_origins,
        vec![
            "https://wealthsync-frontend2.onrender.com".to_string(),
            "http://localhost:3000".to_string()
        ]
    );
}

#[test]
fn test_config_from_env() {
    // Only this test reads or writes the variable within this test binary
    std::env::set_var(
        ALLOWED_ORIGINS_ENV,
        "https://app.example.com/, http://localhost:5173",
    );
    let configured = ServerConfig::from_env();

    std::env::set_var(ALLOWED_ORIGINS_ENV, "");
    let same_origin_only = ServerConfig::from_env();

    std::env::remove_var(ALLOWED_ORIGINS_ENV);
    let unset = ServerConfig::from_env();

    assert_eq!(
        configured.allowed_origins,
        vec![
            "https://app.example.com".to_string(),
            "http://localhost:5173".to_string()
        ]
    );
    assert!(same_origin_only.allowed_origins.is_empty());
    assert_eq!(
        unset.allowed_origins,
        ServerConfig::default().allowed_origins
    );
}
