use serde::{Deserialize, Serialize};
use service_core::utils::{FieldKind, FieldSpec, PayloadSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    pub topic: Option<String>,
}

impl PayloadSchema for ContactMessage {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("email", FieldKind::Text),
        FieldSpec::required("message", FieldKind::Text),
        FieldSpec::optional("topic", FieldKind::Text),
    ];
}
