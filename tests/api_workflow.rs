use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use loan_checker::api::{SharedService, api_routes};
use loan_checker::{LoanService, SqliteStorage};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

const CATALOG: &str = "\
bank_name,loan_name,interest_rate,max_loan_amount,eligibility_criteria,repayment_period,processing_fee,required_documents
Canara Bank,Vidya Turant,9.25,300000,Admission to premier institute,10,0,Admission letter
Bank of Baroda,Baroda Vidya,8.85,600000,Indian nationals,12,0.5,Marksheets
SBI,Global Ed-Vantage,10.15,1000000,Studies abroad,15,10000,Passport
";

fn app() -> Router {
    let storage = SqliteStorage::open_in_memory().expect("in-memory database");
    let mut service = LoanService::new(storage, "api-test-secret", 4);
    service
        .ensure_catalog_loaded_from(CATALOG.as_bytes())
        .expect("catalog loads");
    let shared: SharedService = Arc::new(Mutex::new(service));
    Router::new().nest("/api", api_routes(shared))
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    };

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let credentials = json!({ "username": username, "password": "s3cret" });
    let (status, _) = send(app, "POST", "/api/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, "POST", "/api/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

fn profile_body(gpa: f64, caste_category: &str) -> Value {
    json!({
        "name": "Asha Verma",
        "age": 19,
        "date_of_birth": "2005-03-14",
        "contact": "+91 98765 43210",
        "address": "12 MG Road, Pune",
        "caste_category": caste_category,
        "gpa": gpa,
        "transaction_history": "No Defaults, Regular Payer",
        "certifications": "",
        "exam_scores": "JEE: 90"
    })
}

#[tokio::test]
async fn duplicate_registration_returns_conflict() {
    let app = app();
    let credentials = json!({ "username": "asha", "password": "s3cret" });

    let (first, body) = send(&app, "POST", "/api/register", None, Some(credentials.clone())).await;
    let (second, error) = send(&app, "POST", "/api/register", None, Some(credentials)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(body["account_id"], 1);
    assert_eq!(second, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("asha"));
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = app();
    register_and_login(&app, "asha").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "asha", "password": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = app();

    let (missing, _) = send(&app, "GET", "/api/profile", None, None).await;
    let (bogus, _) = send(&app, "GET", "/api/profile", Some("bogus"), None).await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(bogus, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_and_recommendation_flow() {
    let app = app();
    let token = register_and_login(&app, "asha").await;

    let (status, body) = send(&app, "GET", "/api/recommendations", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Please enter your details first");

    let (status, _) = send(&app, "PUT", "/api/profile", Some(&token), Some(profile_body(9.2, "General"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, saved) = send(&app, "PUT", "/api/profile", Some(&token), Some(profile_body(8.5, "General"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["gpa"], 8.5);

    let (status, profile) = send(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["gpa"], 8.5);
    assert_eq!(profile["caste_category"], "General");

    let (status, body) = send(&app, "GET", "/api/recommendations", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student_name"], "Asha Verma");
    let labels: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["High GPA Loan", "Premium Bank Loan"]);
}

#[tokio::test]
async fn invalid_profile_is_a_bad_request() {
    let app = app();
    let token = register_and_login(&app, "asha").await;

    let (status, body) = send(&app, "PUT", "/api/profile", Some(&token), Some(profile_body(5.0, "Unknown"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("General, OBC, SC, ST, Other"));
}

#[tokio::test]
async fn loan_search_filters_catalog() {
    let app = app();
    let token = register_and_login(&app, "asha").await;

    let (status, body) = send(&app, "GET", "/api/loans?max_amount=500000", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let banks: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["bank_name"].as_str().unwrap())
        .collect();
    assert_eq!(banks, vec!["Bank of Baroda", "SBI"]);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = app();
    let token = register_and_login(&app, "asha").await;

    let (status, _) = send(&app, "POST", "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app();
    let token = register_and_login(&app, "asha").await;

    let (status, body) = send(&app, "GET", "/api/loans", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("max_amount"));

    let (status, body) = send(&app, "GET", "/api/loans?max_amount=lots", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let mut negative_age = profile_body(7.0, "General");
    negative_age["age"] = json!(-3);
    let (status, body) = send(&app, "PUT", "/api/profile", Some(&token), Some(negative_age)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "POST", "/api/register", None, Some(json!({ "username": "ravi" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("password"));
}
