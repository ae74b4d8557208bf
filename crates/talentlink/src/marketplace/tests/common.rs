use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::marketplace::domain::{
    Application, ApplicationId, ApplicationSubmission, ApplicationView, Brand, BrandId,
    BrandSubmission,
};
use crate::marketplace::memory::InMemoryDocumentStore;
use crate::marketplace::repository::{ApplicationRepository, BrandRepository, RepositoryError};
use crate::marketplace::router::{marketplace_router, MarketplaceState};
use crate::marketplace::service::MarketplaceService;
use crate::marketplace::session::{SessionProvider, SessionUser, StaticTokenSessions};

pub(super) const TOKEN: &str = "test-token";

pub(super) type MemoryService = MarketplaceService<InMemoryDocumentStore, InMemoryDocumentStore>;

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Clock advancing one minute per call so ordering is deterministic.
pub(super) fn ticking_clock() -> Arc<dyn Fn() -> DateTime<Utc> + Send + Sync> {
    let ticks = AtomicI64::new(0);
    Arc::new(move || base_time() + Duration::minutes(ticks.fetch_add(1, Ordering::Relaxed)))
}

pub(super) fn user() -> SessionUser {
    SessionUser {
        id: "user_2riley".to_string(),
        email: Some("riley@example.com".to_string()),
    }
}

pub(super) fn sessions() -> Arc<dyn SessionProvider> {
    Arc::new(StaticTokenSessions::new().with_token(TOKEN, user()))
}

pub(super) fn submission_json() -> Value {
    json!({
        "userId": "user_2riley",
        "brandName": "Acme Outdoors",
        "message": "I review trail gear every week and would love to partner.",
        "name": "Riley Park",
        "mobile": "+1 555 0100",
        "socialCount": 48000,
        "socialLink": "https://instagram.com/rileyparks",
        "userImage": "https://cdn.example.com/riley.jpg",
        "role": "Brand Ambassador",
        "description": "Spring hiking campaign",
        "requirements": ["3 feed posts", "1 reel"],
        "compensation": "$1,500 per month",
    })
}

pub(super) fn submission() -> ApplicationSubmission {
    serde_json::from_value(submission_json()).expect("fixture parses")
}

pub(super) fn brand_submission(name: &str) -> BrandSubmission {
    BrandSubmission {
        name: Some(name.to_string()),
        description: Some("Technical apparel for the outdoors".to_string()),
        logo: Some("https://cdn.example.com/acme.png".to_string()),
        website: Some("https://acme.example.com".to_string()),
        industry: Some("Retail".to_string()),
    }
}

pub(super) fn build_service() -> (MemoryService, InMemoryDocumentStore) {
    let store = InMemoryDocumentStore::new();
    let shared = Arc::new(store.clone());
    let service = MarketplaceService::with_clock(shared.clone(), shared, ticking_clock());
    (service, store)
}

pub(super) fn state<B, A>(service: MarketplaceService<B, A>) -> MarketplaceState<B, A> {
    MarketplaceState {
        service: Arc::new(service),
        sessions: sessions(),
    }
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    marketplace_router(Arc::new(service), sessions())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose brand join is broken but plain reads still work.
#[derive(Default, Clone)]
pub(super) struct BrokenJoinStore {
    pub(super) inner: InMemoryDocumentStore,
}

impl ApplicationRepository for BrokenJoinStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        ApplicationRepository::insert(&self.inner, application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        ApplicationRepository::fetch(&self.inner, id)
    }

    fn update(&self, application: Application) -> Result<Application, RepositoryError> {
        ApplicationRepository::update(&self.inner, application)
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        ApplicationRepository::list(&self.inner)
    }

    fn list_enriched(&self) -> Result<Vec<ApplicationView>, RepositoryError> {
        Err(RepositoryError::Unavailable("brand join failed".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl ApplicationRepository for UnavailableStore {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_enriched(&self) -> Result<Vec<ApplicationView>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl BrandRepository for UnavailableStore {
    fn insert(&self, _brand: Brand) -> Result<Brand, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BrandId) -> Result<Option<Brand>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_by_name(&self, _name: &str) -> Result<Option<Brand>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Brand>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
