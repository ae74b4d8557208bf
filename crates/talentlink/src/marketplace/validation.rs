use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{
    cast_scalar, ApplicationDetails, ApplicationSubmission, BrandId, BrandSubmission, SocialCount,
};

/// One failed schema check, reported back to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, format!("Path `{field}` is required."))
    }
}

/// Collected schema failures for a single write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|error| error.field.as_str())
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sequence coercion applied before validation: anything that is not an array becomes empty.
pub fn coerce_requirements(raw: Option<&Value>) -> Result<Vec<String>, Vec<FieldError>> {
    let Some(Value::Array(items)) = raw else {
        return Ok(Vec::new());
    };

    let mut requirements = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match cast_scalar(item) {
            Some(text) => requirements.push(text),
            None => errors.push(FieldError::new(
                format!("requirements.{index}"),
                format!("Cast to string failed for value {item} at path `requirements.{index}`"),
            )),
        }
    }

    if errors.is_empty() {
        Ok(requirements)
    } else {
        Err(errors)
    }
}

/// Schema checks applied to application writes.
#[derive(Debug, Default)]
pub struct ApplicationSchema {
    errors: Vec<FieldError>,
}

impl ApplicationSchema {
    /// Convert a (backfilled) submission into the stored field set.
    pub fn details_from_submission(
        submission: &ApplicationSubmission,
    ) -> Result<(Option<BrandId>, ApplicationDetails), ValidationErrors> {
        let mut schema = Self::default();

        let user_id = schema.required("userId", submission.user_id.as_deref());
        let brand_name = schema.required("brandName", submission.brand_name.as_deref());
        let message = schema.required("message", submission.message.as_deref());
        let name = schema.required("name", submission.name.as_deref());
        let mobile = schema.required("mobile", submission.mobile.as_deref());
        let social_count = schema.social_count(submission.social_count.as_ref());
        let social_link = schema.required("socialLink", submission.social_link.as_deref());
        let role = schema.required("role", submission.role.as_deref());
        let description = schema.required("description", submission.description.as_deref());
        let requirements = match coerce_requirements(submission.requirements.as_ref()) {
            Ok(requirements) => requirements,
            Err(errors) => {
                schema.errors.extend(errors);
                Vec::new()
            }
        };
        let compensation = schema.required("compensation", submission.compensation.as_deref());

        if !schema.errors.is_empty() {
            return Err(ValidationErrors(schema.errors));
        }

        let brand_id = normalized_brand_id(submission.brand_id.as_deref());
        let details = ApplicationDetails {
            user_id,
            brand_name,
            message,
            name,
            mobile,
            social_count: social_count.unwrap_or(SocialCount::Text(String::new())),
            social_link,
            user_image: submission.user_image.clone(),
            role,
            description,
            requirements,
            compensation,
        };

        Ok((brand_id, details))
    }

    fn required(&mut self, field: &str, value: Option<&str>) -> String {
        match value {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => {
                self.errors.push(FieldError::required(field));
                String::new()
            }
        }
    }

    fn social_count(&mut self, value: Option<&Value>) -> Option<SocialCount> {
        match value {
            None | Some(Value::Null) => {
                self.errors.push(FieldError::required("socialCount"));
                None
            }
            Some(Value::Number(number)) => Some(SocialCount::Number(number.clone())),
            Some(Value::String(text)) => Some(SocialCount::Text(text.clone())),
            Some(Value::Bool(flag)) => Some(SocialCount::Text(flag.to_string())),
            Some(other) => {
                self.errors.push(FieldError::new(
                    "socialCount",
                    format!("Path `socialCount` must be a number or a string, found {other}"),
                ));
                None
            }
        }
    }
}

/// Validated brand fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandFields {
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
}

/// Schema checks applied to brand writes.
pub fn brand_fields(submission: &BrandSubmission) -> Result<BrandFields, ValidationErrors> {
    let mut errors = Vec::new();

    let name = submission.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.push(FieldError::required("name"));
    }
    let description = submission.description.as_deref().unwrap_or_default();
    if description.trim().is_empty() {
        errors.push(FieldError::required("description"));
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(BrandFields {
        name: name.to_string(),
        description: description.to_string(),
        logo: optional(submission.logo.as_deref()),
        website: optional(submission.website.as_deref()),
        industry: optional(submission.industry.as_deref()),
    })
}

/// An empty or blank reference is treated as no reference.
pub fn normalized_brand_id(raw: Option<&str>) -> Option<BrandId> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| BrandId(id.to_string()))
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
