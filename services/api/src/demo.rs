use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talentlink::error::AppError;
use talentlink::marketplace::{
    ApplicationStatus, ApplicationSubmission, BrandReference, BrandSubmission,
    InMemoryDocumentStore, MarketplaceService, SessionUser, StatusUpdate,
};

use crate::infra::load_brand_seed;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional JSON array of brands to use instead of the built-in samples.
    #[arg(long)]
    pub(crate) seed_brands: Option<PathBuf>,
    /// Status applied to the first application during the review step.
    #[arg(long, default_value = "accepted")]
    pub(crate) decision: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed_brands,
        decision,
    } = args;

    let store = Arc::new(InMemoryDocumentStore::new());
    let service = MarketplaceService::new(store.clone(), store);
    let manager = SessionUser {
        id: "demo_manager".to_string(),
        email: Some("manager@talentlink.example".to_string()),
    };

    let brands = match seed_brands {
        Some(path) => load_brand_seed(&path)?,
        None => sample_brands(),
    };
    let report = service.seed_brands(brands)?;
    println!("TalentLink marketplace demo");
    println!(
        "Brands loaded: {} inserted, {} skipped",
        report.inserted, report.skipped
    );

    let brands = service.list_brands(Some(&manager))?;
    for brand in &brands {
        println!(
            "- {} ({})",
            brand.name,
            brand.industry.as_deref().unwrap_or("industry not set")
        );
    }

    println!("\nSubmitting applications");
    let mut submitted = Vec::new();
    if let Some(brand) = brands.first() {
        let mut submission = sample_submission("Riley Park", "48k");
        submission.brand_id = Some(brand.id.0.clone());
        submission.brand_name = None;
        let application = service.submit_application(Some(&manager), submission)?;
        println!(
            "- {} -> {} (brand name backfilled from reference)",
            application.details.name, application.details.brand_name
        );
        submitted.push(application);
    }

    let mut dangling = sample_submission("Jordan Lee", "120000");
    dangling.brand_id = Some("retired-brand".to_string());
    dangling.brand_name = Some("Retired Co".to_string());
    let application = service.submit_application(Some(&manager), dangling)?;
    println!(
        "- {} -> {} (reference does not resolve)",
        application.details.name, application.details.brand_name
    );
    submitted.push(application);

    if let Some(first) = submitted.first() {
        let updated = service.update_status(
            Some(&manager),
            StatusUpdate {
                application_id: Some(first.id.0.clone()),
                status: Some(decision),
            },
        )?;
        println!(
            "\nReviewed {}: {} -> {}",
            updated.details.name,
            ApplicationStatus::Pending,
            updated.status
        );
    }

    let listing = service.list_applications(Some(&manager))?;
    println!("\nApplications (newest first)");
    for view in &listing.applications {
        let brand = match &view.brand_id {
            Some(BrandReference::Populated(summary)) => {
                format!("{} [{}]", summary.name, summary.website.as_deref().unwrap_or("-"))
            }
            Some(BrandReference::Unresolved { name }) => format!("{name} [unresolved]"),
            Some(BrandReference::Raw(id)) => format!("{id} [not joined]"),
            None => "no brand".to_string(),
        };
        println!(
            "- {} | {} | {} | {} followers | {} requirement(s)",
            view.details.name,
            brand,
            view.status,
            view.details.social_count,
            view.details.requirements.len()
        );
    }

    Ok(())
}

fn sample_brands() -> Vec<BrandSubmission> {
    vec![
        BrandSubmission {
            name: Some("Acme Outdoors".to_string()),
            description: Some("Technical apparel for the trail".to_string()),
            logo: Some("https://cdn.talentlink.example/acme.png".to_string()),
            website: Some("https://acme.example".to_string()),
            industry: Some("Retail".to_string()),
        },
        BrandSubmission {
            name: Some("Globex Energy".to_string()),
            description: Some("Sugar-free energy drinks".to_string()),
            logo: None,
            website: Some("https://globex.example".to_string()),
            industry: Some("Beverages".to_string()),
        },
    ]
}

fn sample_submission(name: &str, social_count: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        user_id: Some(format!("user_{}", name.to_ascii_lowercase().replace(' ', "_"))),
        message: Some("Long-time customer; my audience asks about your products weekly.".to_string()),
        name: Some(name.to_string()),
        mobile: Some("+1 555 0100".to_string()),
        social_count: Some(serde_json::Value::String(social_count.to_string())),
        social_link: Some("https://instagram.com/talentlink_demo".to_string()),
        role: Some("Brand Ambassador".to_string()),
        description: Some("Quarterly content partnership".to_string()),
        requirements: Some(serde_json::json!(["2 feed posts", "1 story set"])),
        compensation: Some("$1,200 per quarter".to_string()),
        ..ApplicationSubmission::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_against_sample_brands() {
        run_demo(DemoArgs {
            seed_brands: None,
            decision: "rejected".to_string(),
        })
        .expect("demo completes");
    }

    #[test]
    fn demo_rejects_unknown_decision() {
        let result = run_demo(DemoArgs {
            seed_brands: None,
            decision: "shortlisted".to_string(),
        });
        assert!(matches!(result, Err(AppError::Marketplace(_))));
    }
}
