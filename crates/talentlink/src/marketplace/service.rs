use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, ApplicationView, Brand,
    BrandId, BrandSubmission, StatusUpdate,
};
use super::repository::{ApplicationRepository, BrandRepository, RepositoryError};
use super::session::SessionUser;
use super::validation::{
    brand_fields, normalized_brand_id, ApplicationSchema, FieldError, ValidationErrors,
};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Service composing the brand and application collections.
pub struct MarketplaceService<B, A> {
    brands: Arc<B>,
    applications: Arc<A>,
    clock: Clock,
}

/// Listing result returned to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationListing {
    pub applications: Vec<ApplicationView>,
    pub user: SessionUser,
    /// False when the brand join failed and the plain listing was served.
    #[serde(skip)]
    pub enriched: bool,
}

/// Outcome of a bulk brand seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl<B, A> MarketplaceService<B, A>
where
    B: BrandRepository + 'static,
    A: ApplicationRepository + 'static,
{
    pub fn new(brands: Arc<B>, applications: Arc<A>) -> Self {
        Self::with_clock(brands, applications, Arc::new(Utc::now))
    }

    pub fn with_clock(brands: Arc<B>, applications: Arc<A>, clock: Clock) -> Self {
        Self {
            brands,
            applications,
            clock,
        }
    }

    /// Validate and store a new application in the `pending` state.
    pub fn submit_application(
        &self,
        session: Option<&SessionUser>,
        mut submission: ApplicationSubmission,
    ) -> Result<Application, MarketplaceError> {
        authorize(session)?;

        self.backfill_brand_name(&mut submission);
        let (brand_id, details) = ApplicationSchema::details_from_submission(&submission)?;

        let now = (self.clock)();
        let application = Application {
            id: ApplicationId::generate(),
            brand_id,
            details,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let stored = self.applications.insert(application)?;
        info!(
            application_id = %stored.id,
            brand = %stored.details.brand_name,
            "application submitted"
        );
        Ok(stored)
    }

    /// Copy the referenced brand's name when the client left it blank.
    ///
    /// Lookup failures are logged and otherwise ignored.
    fn backfill_brand_name(&self, submission: &mut ApplicationSubmission) {
        let has_name = submission
            .brand_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if has_name {
            return;
        }
        let Some(brand_id) = normalized_brand_id(submission.brand_id.as_deref()) else {
            return;
        };

        match self.brands.fetch(&brand_id) {
            Ok(Some(brand)) => {
                debug!(%brand_id, brand = %brand.name, "backfilled brand name");
                submission.brand_name = Some(brand.name);
            }
            Ok(None) => warn!(%brand_id, "brand name backfill skipped: brand not found"),
            Err(err) => warn!(%brand_id, error = %err, "brand name backfill failed"),
        }
    }

    /// All applications newest first, joined with brand details when possible.
    pub fn list_applications(
        &self,
        session: Option<&SessionUser>,
    ) -> Result<ApplicationListing, MarketplaceError> {
        let user = authorize(session)?.clone();

        match self.applications.list_enriched() {
            Ok(applications) => Ok(ApplicationListing {
                applications,
                user,
                enriched: true,
            }),
            Err(err) => {
                warn!(error = %err, "brand enrichment failed; serving plain listing");
                let applications = self
                    .applications
                    .list()?
                    .into_iter()
                    .map(ApplicationView::unenriched)
                    .collect();
                Ok(ApplicationListing {
                    applications,
                    user,
                    enriched: false,
                })
            }
        }
    }

    /// Overwrite the status of one application. Any status may follow any other.
    pub fn update_status(
        &self,
        session: Option<&SessionUser>,
        update: StatusUpdate,
    ) -> Result<Application, MarketplaceError> {
        authorize(session)?;

        let application_id = update
            .application_id
            .filter(|id| !id.trim().is_empty())
            .map(ApplicationId)
            .ok_or(MarketplaceError::NotFound)?;
        let mut application = self
            .applications
            .fetch(&application_id)?
            .ok_or(MarketplaceError::NotFound)?;

        let status = match update.status.as_deref() {
            None | Some("") => {
                return Err(ValidationErrors::single(FieldError::required("status")).into())
            }
            Some(raw) => raw.parse::<ApplicationStatus>().map_err(|err| {
                ValidationErrors::single(FieldError::new("status", err.to_string()))
            })?,
        };
        let previous = application.status;
        application.status = status;
        application.updated_at = (self.clock)();

        let updated = self.applications.update(application)?;
        info!(%application_id, from = %previous, to = %status, "application status updated");
        Ok(updated)
    }

    /// Register a brand; names must be unique.
    pub fn register_brand(
        &self,
        session: Option<&SessionUser>,
        submission: BrandSubmission,
    ) -> Result<Brand, MarketplaceError> {
        authorize(session)?;
        self.insert_brand(&submission)
    }

    pub fn list_brands(&self, session: Option<&SessionUser>) -> Result<Vec<Brand>, MarketplaceError> {
        authorize(session)?;
        Ok(self.brands.list()?)
    }

    /// Startup bulk load. Brands whose name already exists are skipped.
    pub fn seed_brands(
        &self,
        submissions: Vec<BrandSubmission>,
    ) -> Result<SeedReport, MarketplaceError> {
        let mut report = SeedReport::default();
        for submission in submissions {
            let name = submission.name.as_deref().map(str::trim).unwrap_or_default();
            if !name.is_empty() && self.brands.fetch_by_name(name)?.is_some() {
                debug!(name, "brand already present; skipping seed entry");
                report.skipped += 1;
                continue;
            }
            self.insert_brand(&submission)?;
            report.inserted += 1;
        }
        Ok(report)
    }

    fn insert_brand(&self, submission: &BrandSubmission) -> Result<Brand, MarketplaceError> {
        let fields = brand_fields(submission)?;
        let now = (self.clock)();
        let brand = Brand {
            id: BrandId::generate(),
            name: fields.name,
            description: fields.description,
            logo: fields.logo,
            website: fields.website,
            industry: fields.industry,
            created_at: now,
            updated_at: now,
        };

        let stored = self.brands.insert(brand)?;
        info!(brand_id = %stored.id, name = %stored.name, "brand registered");
        Ok(stored)
    }
}

fn authorize(session: Option<&SessionUser>) -> Result<&SessionUser, MarketplaceError> {
    session.ok_or(MarketplaceError::Unauthorized)
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("{0}")]
    Server(String),
}

impl From<RepositoryError> for MarketplaceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => Self::Conflict,
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Unavailable(_) => Self::Server(value.to_string()),
        }
    }
}
