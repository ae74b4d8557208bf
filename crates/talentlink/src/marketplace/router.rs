use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{ApplicationSubmission, BrandSubmission, StatusUpdate};
use super::repository::{ApplicationRepository, BrandRepository};
use super::service::{MarketplaceError, MarketplaceService};
use super::session::{SessionProvider, SessionUser};
use super::validation::FieldError;

/// Shared handler state: the service plus the session resolver.
pub struct MarketplaceState<B, A> {
    pub service: Arc<MarketplaceService<B, A>>,
    pub sessions: Arc<dyn SessionProvider>,
}

impl<B, A> Clone for MarketplaceState<B, A> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Session of the caller, if any. Never rejects; handlers decide.
pub struct CurrentSession(pub Option<SessionUser>);

#[async_trait]
impl<B, A> FromRequestParts<MarketplaceState<B, A>> for CurrentSession
where
    B: Send + Sync,
    A: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &MarketplaceState<B, A>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.sessions.resolve(&parts.headers)))
    }
}

/// Router builder exposing the application and brand endpoints.
pub fn marketplace_router<B, A>(
    service: Arc<MarketplaceService<B, A>>,
    sessions: Arc<dyn SessionProvider>,
) -> Router
where
    B: BrandRepository + 'static,
    A: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            post(submit_handler::<B, A>)
                .get(list_handler::<B, A>)
                .put(status_handler::<B, A>),
        )
        .route(
            "/api/brands",
            post(register_brand_handler::<B, A>).get(list_brands_handler::<B, A>),
        )
        .with_state(MarketplaceState { service, sessions })
}

pub(crate) async fn submit_handler<B, A>(
    State(state): State<MarketplaceState<B, A>>,
    CurrentSession(session): CurrentSession,
    payload: Result<Json<ApplicationSubmission>, JsonRejection>,
) -> Response
where
    B: BrandRepository + 'static,
    A: ApplicationRepository + 'static,
{
    if session.is_none() {
        return unauthorized();
    }
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return invalid_body(rejection),
    };

    match state.service.submit_application(session.as_ref(), submission) {
        Ok(application) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "application": application })),
        )
            .into_response(),
        Err(MarketplaceError::Unauthorized) => unauthorized(),
        Err(MarketplaceError::Validation(errors)) => validation_failed(errors.0),
        Err(other) => {
            error!(error = %other, "error creating application");
            let payload = json!({
                "success": false,
                "message": "Error creating application.",
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<B, A>(
    State(state): State<MarketplaceState<B, A>>,
    CurrentSession(session): CurrentSession,
) -> Response
where
    B: BrandRepository + 'static,
    A: ApplicationRepository + 'static,
{
    match state.service.list_applications(session.as_ref()) {
        Ok(listing) => {
            let payload = json!({
                "success": true,
                "applications": listing.applications,
                "user": listing.user,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(MarketplaceError::Unauthorized) => unauthorized(),
        Err(other) => {
            error!(error = %other, "error fetching applications");
            let payload = json!({
                "success": false,
                "message": "Error fetching applications from database",
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<B, A>(
    State(state): State<MarketplaceState<B, A>>,
    CurrentSession(session): CurrentSession,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Response
where
    B: BrandRepository + 'static,
    A: ApplicationRepository + 'static,
{
    if session.is_none() {
        return unauthorized();
    }
    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => return invalid_body(rejection),
    };

    match state.service.update_status(session.as_ref(), update) {
        Ok(application) => (
            StatusCode::OK,
            Json(json!({ "success": true, "application": application })),
        )
            .into_response(),
        Err(MarketplaceError::Unauthorized) => unauthorized(),
        Err(MarketplaceError::NotFound) => failure(StatusCode::NOT_FOUND, "Application not found."),
        Err(other) => {
            error!(error = %other, "error updating application");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Error updating application.")
        }
    }
}

pub(crate) async fn register_brand_handler<B, A>(
    State(state): State<MarketplaceState<B, A>>,
    CurrentSession(session): CurrentSession,
    payload: Result<Json<BrandSubmission>, JsonRejection>,
) -> Response
where
    B: BrandRepository + 'static,
    A: ApplicationRepository + 'static,
{
    if session.is_none() {
        return unauthorized();
    }
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return invalid_body(rejection),
    };

    match state.service.register_brand(session.as_ref(), submission) {
        Ok(brand) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "brand": brand })),
        )
            .into_response(),
        Err(MarketplaceError::Unauthorized) => unauthorized(),
        Err(MarketplaceError::Validation(errors)) => validation_failed(errors.0),
        Err(MarketplaceError::Conflict) => {
            failure(StatusCode::CONFLICT, "Brand name already exists.")
        }
        Err(other) => {
            error!(error = %other, "error creating brand");
            let payload = json!({
                "success": false,
                "message": "Error creating brand.",
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_brands_handler<B, A>(
    State(state): State<MarketplaceState<B, A>>,
    CurrentSession(session): CurrentSession,
) -> Response
where
    B: BrandRepository + 'static,
    A: ApplicationRepository + 'static,
{
    match state.service.list_brands(session.as_ref()) {
        Ok(brands) => (
            StatusCode::OK,
            Json(json!({ "success": true, "brands": brands })),
        )
            .into_response(),
        Err(MarketplaceError::Unauthorized) => unauthorized(),
        Err(other) => {
            error!(error = %other, "error fetching brands");
            let payload = json!({
                "success": false,
                "message": "Error fetching brands from database",
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn unauthorized() -> Response {
    failure(StatusCode::UNAUTHORIZED, "Unauthorized")
}

fn invalid_body(rejection: JsonRejection) -> Response {
    let payload = json!({
        "success": false,
        "message": "Invalid request body",
        "error": rejection.body_text(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn validation_failed(errors: Vec<FieldError>) -> Response {
    let payload = json!({
        "success": false,
        "message": "Validation error",
        "errors": errors,
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}
