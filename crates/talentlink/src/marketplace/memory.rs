use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Application, ApplicationId, ApplicationView, Brand, BrandId};
use super::repository::{ApplicationRepository, BrandRepository, RepositoryError};

/// Process-local document store holding the brand and application collections.
///
/// Cloning shares the underlying collections.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    brands: Arc<Mutex<HashMap<BrandId, Brand>>>,
    // insertion order doubles as the tie-breaker for equal timestamps
    applications: Arc<Mutex<Vec<Application>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn brands(&self) -> Result<MutexGuard<'_, HashMap<BrandId, Brand>>, RepositoryError> {
        self.brands
            .lock()
            .map_err(|_| RepositoryError::Unavailable("brand collection lock poisoned".into()))
    }

    fn applications(&self) -> Result<MutexGuard<'_, Vec<Application>>, RepositoryError> {
        self.applications.lock().map_err(|_| {
            RepositoryError::Unavailable("application collection lock poisoned".into())
        })
    }
}

impl BrandRepository for InMemoryDocumentStore {
    fn insert(&self, brand: Brand) -> Result<Brand, RepositoryError> {
        let mut guard = self.brands()?;
        let duplicate = guard.contains_key(&brand.id)
            || guard.values().any(|existing| existing.name == brand.name);
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(brand.id.clone(), brand.clone());
        Ok(brand)
    }

    fn fetch(&self, id: &BrandId) -> Result<Option<Brand>, RepositoryError> {
        Ok(self.brands()?.get(id).cloned())
    }

    fn fetch_by_name(&self, name: &str) -> Result<Option<Brand>, RepositoryError> {
        Ok(self
            .brands()?
            .values()
            .find(|brand| brand.name == name)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Brand>, RepositoryError> {
        let mut brands: Vec<Brand> = self.brands()?.values().cloned().collect();
        brands.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(brands)
    }
}

impl ApplicationRepository for InMemoryDocumentStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.applications()?;
        if guard.iter().any(|existing| existing.id == application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self
            .applications()?
            .iter()
            .find(|application| &application.id == id)
            .cloned())
    }

    fn update(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.applications()?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == application.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = application.clone();
        Ok(application)
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        let mut applications: Vec<Application> =
            self.applications()?.iter().rev().cloned().collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }

    fn list_enriched(&self) -> Result<Vec<ApplicationView>, RepositoryError> {
        let applications = ApplicationRepository::list(self)?;
        let brands = self.brands()?;

        Ok(applications
            .into_iter()
            .map(|application| {
                let summary = application
                    .brand_id
                    .as_ref()
                    .and_then(|id| brands.get(id))
                    .map(Brand::summary);
                ApplicationView::enriched(application, summary)
            })
            .collect())
    }
}
