use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::{
    api::models::{
        ErrorResponse, LoginRequest, LoginResponse, RecommendationResponse, RecommendedLoan, RegisterRequest,
        RegisterResponse,
    },
    core::{
        models::{AccountId, CasteCategory, DocumentKind, DocumentRef, LoanOffer, Profile, ProfileForm},
        recommendation::LoanLabel,
    },
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register,
        super::handlers::login,
        super::handlers::logout,
        super::handlers::save_profile,
        super::handlers::get_profile,
        super::handlers::get_recommendations,
        super::handlers::find_offers
    ),
    components(schemas(
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        RecommendationResponse,
        RecommendedLoan,
        ErrorResponse,
        AccountId,
        CasteCategory,
        DocumentKind,
        DocumentRef,
        ProfileForm,
        Profile,
        LoanOffer,
        LoanLabel
    )),
    modifiers(&BearerAuth),
    info(
        title = "Loan Checker API",
        description = "API for student registration, profiles and education loan recommendations",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
