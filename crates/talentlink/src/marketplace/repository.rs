use super::domain::{Application, ApplicationId, ApplicationView, Brand, BrandId};

/// Brand collection of the document store.
pub trait BrandRepository: Send + Sync {
    fn insert(&self, brand: Brand) -> Result<Brand, RepositoryError>;
    fn fetch(&self, id: &BrandId) -> Result<Option<Brand>, RepositoryError>;
    fn fetch_by_name(&self, name: &str) -> Result<Option<Brand>, RepositoryError>;
    /// All brands ordered by name.
    fn list(&self) -> Result<Vec<Brand>, RepositoryError>;
}

/// Application collection of the document store.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn update(&self, application: Application) -> Result<Application, RepositoryError>;
    /// All applications, newest first.
    fn list(&self) -> Result<Vec<Application>, RepositoryError>;
    /// All applications, newest first, joined with their brand.
    fn list_enriched(&self) -> Result<Vec<ApplicationView>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
