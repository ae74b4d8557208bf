//! Brand and influencer marketplace: application intake, brand enrichment, and review status.
//!
//! Handlers resolve the caller's session, hand the payload to [`MarketplaceService`], and map
//! its [`MarketplaceError`] variants onto `{ success, ... }` JSON responses. Storage sits behind
//! the [`BrandRepository`] and [`ApplicationRepository`] traits; [`InMemoryDocumentStore`]
//! implements both.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationDetails, ApplicationId, ApplicationStatus, ApplicationSubmission,
    ApplicationView, Brand, BrandId, BrandReference, BrandSubmission, BrandSummary, SocialCount,
    StatusUpdate,
};
pub use memory::InMemoryDocumentStore;
pub use repository::{ApplicationRepository, BrandRepository, RepositoryError};
pub use router::marketplace_router;
pub use service::{ApplicationListing, MarketplaceError, MarketplaceService, SeedReport};
pub use session::{SessionProvider, SessionUser, StaticTokenSessions};
pub use validation::{FieldError, ValidationErrors};
