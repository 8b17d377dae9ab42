use crate::{
    api::{SharedService, models::*},
    core::{
        errors::LoanError,
        models::{LoanOffer, Profile, ProfileForm, Session},
    },
};
use axum::{
    Extension, Json, Router,
    extract::{
        Query, Request, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
};
use http::header;

/// Resolves the bearer token into a [`Session`] for protected routes.
async fn auth_middleware(
    State(service): State<SharedService>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| LoanError::Unauthorized("Missing Authorization header".to_string()))?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
        .ok_or_else(|| LoanError::Unauthorized("Invalid Authorization header".to_string()))?;

    let session = service.lock().await.resolve_session(&token)?;
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

pub fn api_routes(service: SharedService) -> Router {
    let protected_routes = Router::new()
        .route("/logout", post(logout))
        .route("/profile", get(get_profile).put(save_profile))
        .route("/recommendations", get(get_recommendations))
        .route("/loans", get(find_offers))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected_routes)
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid username or password", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(service): State<SharedService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(req) = payload?;
    // bcrypt is CPU-bound; keep it off the async workers.
    let account_id = tokio::task::spawn_blocking(move || service.blocking_lock().register(&req.username, &req.password))
        .await
        .map_err(|e| LoanError::InternalServerError(format!("spawn_blocking failed in register: {}", e)))??;
    Ok((StatusCode::CREATED, Json(RegisterResponse { account_id })))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(service): State<SharedService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    let (session, token) = tokio::task::spawn_blocking(move || service.blocking_lock().login(&req.username, &req.password))
        .await
        .map_err(|e| LoanError::InternalServerError(format!("spawn_blocking failed in login: {}", e)))??;
    Ok(Json(LoginResponse {
        token,
        account_id: session.account_id,
        username: session.username,
    }))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Missing or ended session", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn logout(
    State(service): State<SharedService>,
    Extension(session): Extension<Session>,
) -> StatusCode {
    service.lock().await.logout(&session);
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = ProfileForm,
    responses(
        (status = 200, description = "Profile saved, replacing any previous one", body = Profile),
        (status = 400, description = "Field out of range or not in the allowed set", body = ErrorResponse),
        (status = 401, description = "Missing or ended session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn save_profile(
    State(service): State<SharedService>,
    Extension(session): Extension<Session>,
    payload: Result<Json<ProfileForm>, JsonRejection>,
) -> Result<Json<Profile>, ApiError> {
    let Json(form) = payload?;
    let profile = service.lock().await.save_profile(session.account_id, form)?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Saved profile", body = Profile),
        (status = 401, description = "Missing or ended session", body = ErrorResponse),
        (status = 404, description = "No profile saved yet", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_profile(
    State(service): State<SharedService>,
    Extension(session): Extension<Session>,
) -> Result<Json<Profile>, ApiError> {
    let profile = service
        .lock()
        .await
        .get_profile(session.account_id)?
        .ok_or(LoanError::MissingProfile(session.account_id))?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/recommendations",
    responses(
        (status = 200, description = "Applicable loan labels in rule order", body = RecommendationResponse),
        (status = 401, description = "Missing or ended session", body = ErrorResponse),
        (status = 404, description = "No profile saved yet", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_recommendations(
    State(service): State<SharedService>,
    Extension(session): Extension<Session>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let recommendation = service.lock().await.recommend_for_account(session.account_id)?;
    Ok(Json(recommendation.into()))
}

#[utoipa::path(
    get,
    path = "/api/loans",
    params(
        ("max_amount" = i64, Query, description = "Loan amount the offer must be able to cover")
    ),
    responses(
        (status = 200, description = "Qualifying offers in catalog order", body = Vec<LoanOffer>),
        (status = 400, description = "Missing, non-numeric or negative amount", body = ErrorResponse),
        (status = 401, description = "Missing or ended session", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn find_offers(
    State(service): State<SharedService>,
    query: Result<Query<FindOffersQuery>, QueryRejection>,
) -> Result<Json<Vec<LoanOffer>>, ApiError> {
    let Query(query) = query?;
    let offers = service.lock().await.find_offers(query.max_amount)?;
    Ok(Json(offers))
}
