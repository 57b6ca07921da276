use serde::{Deserialize, Serialize};
use service_core::utils::{FieldKind, FieldSpec, PayloadSchema};
use validator::Validate;

pub const DEFAULT_SOURCE: &str = "website";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PartnerLead {
    #[validate(length(min = 1, message = "Venue name is required"))]
    pub venue_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub contact_email: String,
    pub city: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
}

impl PayloadSchema for PartnerLead {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("venue_name", FieldKind::Text),
        FieldSpec::required("contact_email", FieldKind::Text),
        FieldSpec::optional("city", FieldKind::Text),
        FieldSpec::optional("notes", FieldKind::Text),
        FieldSpec::defaulted("source", FieldKind::Text),
    ];
}
