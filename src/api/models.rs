use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::LoanError;
use crate::core::models::AccountId;
use crate::core::recommendation::{LoanLabel, Recommendation};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub account_id: AccountId,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub account_id: AccountId,
    pub username: String,
}

#[derive(Deserialize, ToSchema)]
pub struct FindOffersQuery {
    pub max_amount: i64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RecommendedLoan {
    pub label: LoanLabel,
    pub detail: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RecommendationResponse {
    pub student_name: String,
    pub recommendations: Vec<RecommendedLoan>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        RecommendationResponse {
            student_name: recommendation.student_name,
            recommendations: recommendation
                .labels
                .into_iter()
                .map(|label| RecommendedLoan {
                    label,
                    detail: label.detail().map(String::from),
                })
                .collect(),
        }
    }
}

// Error response struct
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for LoanError to implement IntoResponse
pub struct ApiError(pub LoanError);

impl From<LoanError> for ApiError {
    fn from(err: LoanError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(LoanError::invalid("body", "Invalid Request Body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(LoanError::invalid("query", "Invalid Query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            LoanError::DuplicateUsername(username) => {
                (StatusCode::CONFLICT, format!("Username {} already exists", username))
            }
            LoanError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password".to_string()),
            LoanError::ValidationError(_, detail) => (StatusCode::BAD_REQUEST, detail.description),
            LoanError::MissingProfile(_) => (
                StatusCode::NOT_FOUND,
                "Please enter your details first".to_string(),
            ),
            LoanError::AccountNotFound(id) => (StatusCode::NOT_FOUND, format!("Account {} not found", id)),
            LoanError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            LoanError::CatalogError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Catalog error: {}", msg)),
            LoanError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg)),
            LoanError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
            ),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
