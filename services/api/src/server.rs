use crate::cli::ServeArgs;
use crate::infra::{load_brand_seed, AppState};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talentlink::config::AppConfig;
use talentlink::error::AppError;
use talentlink::marketplace::{InMemoryDocumentStore, MarketplaceService, SessionProvider};
use talentlink::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed) = args.seed_brands.take() {
        config.store.brand_seed = Some(seed);
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryDocumentStore::new());
    let service = Arc::new(MarketplaceService::new(store.clone(), store));

    if let Some(path) = config.store.brand_seed.as_deref() {
        let brands = load_brand_seed(path)?;
        let report = service.seed_brands(brands)?;
        info!(
            path = %path.display(),
            inserted = report.inserted,
            skipped = report.skipped,
            "brand seed loaded"
        );
    }

    let sessions = config.auth.sessions();
    if sessions.is_empty() {
        warn!("no session tokens configured; every marketplace request will be unauthorized");
    }
    let sessions: Arc<dyn SessionProvider> = Arc::new(sessions);

    let app = with_marketplace_routes(service, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talentlink marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
