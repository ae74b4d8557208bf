use metrics_exporter_prometheus::PrometheusHandle;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talentlink::error::SeedError;
use talentlink::marketplace::BrandSubmission;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read a JSON array of brand registrations from disk.
pub(crate) fn load_brand_seed(path: &Path) -> Result<Vec<BrandSubmission>, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_brand_seed(&raw).map_err(|source| SeedError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub(crate) fn parse_brand_seed(raw: &str) -> Result<Vec<BrandSubmission>, serde_json::Error> {
    serde_json::from_str(raw)
}
