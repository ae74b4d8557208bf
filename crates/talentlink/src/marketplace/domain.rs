use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier wrapper for stored applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for stored brands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub String);

impl BrandId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sponsoring organization that applications are addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Brand {
    pub fn summary(&self) -> BrandSummary {
        BrandSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            logo: self.logo.clone(),
            website: self.website.clone(),
            industry: self.industry.clone(),
        }
    }
}

/// Inbound brand registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSubmission {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub industry: Option<String>,
}

/// Brand fields joined onto applications at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSummary {
    pub id: BrandId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

/// Follower or engagement metric; clients send either a number or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SocialCount {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for SocialCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialCount::Number(number) => write!(f, "{number}"),
            SocialCount::Text(text) => f.write_str(text),
        }
    }
}

/// Review state of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a valid enum value for path `status`.")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Applicant- and opportunity-facing fields shared by stored records and read views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetails {
    pub user_id: String,
    pub brand_name: String,
    pub message: String,
    pub name: String,
    pub mobile: String,
    pub social_count: SocialCount,
    pub social_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    pub role: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub compensation: String,
}

/// Stored application record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub brand_id: Option<BrandId>,
    #[serde(flatten)]
    pub details: ApplicationDetails,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Brand side of an application as returned by the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrandReference {
    /// Join succeeded.
    Populated(BrandSummary),
    /// Join ran but the referenced brand is gone, or no reference was set.
    Unresolved { name: String },
    /// Join was skipped; the raw identifier is passed through.
    Raw(BrandId),
}

/// Application shaped for the listing route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub brand_id: Option<BrandReference>,
    #[serde(flatten)]
    pub details: ApplicationDetails,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationView {
    /// Join result; an absent brand becomes a name-only placeholder.
    pub fn enriched(application: Application, brand: Option<BrandSummary>) -> Self {
        let reference = match brand {
            Some(summary) => BrandReference::Populated(summary),
            None => BrandReference::Unresolved {
                name: application.details.brand_name.clone(),
            },
        };
        Self::with_reference(application, Some(reference))
    }

    /// Plain read without a join.
    pub fn unenriched(application: Application) -> Self {
        let reference = application.brand_id.clone().map(BrandReference::Raw);
        Self::with_reference(application, reference)
    }

    fn with_reference(application: Application, brand_id: Option<BrandReference>) -> Self {
        let Application {
            id,
            details,
            status,
            created_at,
            updated_at,
            ..
        } = application;

        Self {
            id,
            brand_id,
            details,
            status,
            created_at,
            updated_at,
        }
    }
}

/// Inbound application payload before validation.
///
/// Every field is optional so that missing values surface as field-level
/// validation errors instead of a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub brand_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub mobile: Option<String>,
    #[serde(default)]
    pub social_count: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub social_link: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub user_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub compensation: Option<String>,
}

/// Inbound status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub application_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub status: Option<String>,
}

/// Accepts strings, numbers, and booleans, casting the latter two to text.
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => cast_scalar(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a string, found {value}"))
        }),
    }
}

/// Text form of a scalar JSON value; `None` for null, arrays, and objects.
pub(crate) fn cast_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parses_known_labels_only() {
        assert_eq!(
            "accepted".parse::<ApplicationStatus>(),
            Ok(ApplicationStatus::Accepted)
        );
        assert_eq!(
            "archived".parse::<ApplicationStatus>(),
            Err(UnknownStatus("archived".to_string()))
        );
        assert!("Pending".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn submission_casts_scalar_strings() {
        let submission: ApplicationSubmission = serde_json::from_value(json!({
            "userId": 42,
            "mobile": 5550100,
            "name": true,
            "brandName": null,
        }))
        .expect("payload parses");

        assert_eq!(submission.user_id.as_deref(), Some("42"));
        assert_eq!(submission.mobile.as_deref(), Some("5550100"));
        assert_eq!(submission.name.as_deref(), Some("true"));
        assert_eq!(submission.brand_name, None);
        assert_eq!(submission.message, None);
    }

    #[test]
    fn submission_rejects_object_for_string_field() {
        let result = serde_json::from_value::<ApplicationSubmission>(json!({
            "message": { "text": "hello" },
        }));
        assert!(result.is_err());
    }

    #[test]
    fn social_count_keeps_wire_representation() {
        let number: SocialCount = serde_json::from_value(json!(12500)).expect("number");
        let text: SocialCount = serde_json::from_value(json!("12.5k")).expect("text");

        assert!(matches!(number, SocialCount::Number(_)));
        assert_eq!(serde_json::to_value(&number).expect("serialize"), json!(12500));
        assert_eq!(text, SocialCount::Text("12.5k".to_string()));
        assert_eq!(number.to_string(), "12500");
    }

    #[test]
    fn unresolved_brand_reference_serializes_as_name_only() {
        let reference = BrandReference::Unresolved {
            name: "Acme".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&reference).expect("serialize"),
            json!({ "name": "Acme" })
        );
    }
}
