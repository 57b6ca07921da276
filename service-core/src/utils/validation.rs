use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

/// JSON shape a payload field must have before it is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    /// Well-typed stand-in for a rejected value, so the remaining fields can
    /// still be deserialized and checked.
    fn placeholder(self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::TextList => Value::Array(Vec::new()),
        }
    }

    fn type_error(self) -> ValidationError {
        let message = match self {
            FieldKind::Text => "Expected a string",
            FieldKind::TextList => "Expected a list of strings",
        };
        ValidationError::new("type").with_message(Cow::Borrowed(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and not null.
    Required,
    /// May be omitted (a default applies) but not null.
    Defaulted,
    /// May be omitted or null.
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, presence: Presence::Required }
    }

    pub const fn defaulted(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, presence: Presence::Defaulted }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, presence: Presence::Optional }
    }

    fn check(&self, value: Option<&Value>) -> Result<(), ValidationError> {
        match (value, self.presence) {
            (None, Presence::Required) => Err(ValidationError::new("required")
                .with_message(Cow::Borrowed("Field required"))),
            (None, _) | (Some(Value::Null), Presence::Optional) => Ok(()),
            (Some(value), _) if self.kind.accepts(value) => Ok(()),
            (Some(_), _) => Err(self.kind.type_error()),
        }
    }
}

/// Field layout of a request body, checked field by field so that one
/// response can name every missing or wrong-typed field.
pub trait PayloadSchema {
    const FIELDS: &'static [FieldSpec];
}

/// JSON body extractor that checks field shapes, deserializes, then runs
/// `validator` rules.
///
/// Shape failures and rule violations end up in one
/// [`AppError::ValidationError`] keyed by field; a field with a shape
/// failure is not also reported for its rules. Both map to 422.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + PayloadSchema + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        parse_payload(body).map(ValidatedJson)
    }
}

/// Checks `body` against `T`'s schema and rules, collecting every failure.
pub fn parse_payload<T>(body: Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate + PayloadSchema,
{
    let Value::Object(mut object) = body else {
        return Err(AppError::InvalidPayload(
            "Expected a JSON object".to_string(),
        ));
    };

    let mut errors = check_shapes(T::FIELDS, &mut object);

    let value: T = serde_json::from_value(Value::Object(object))
        .map_err(|e| AppError::InvalidPayload(e.to_string()))?;

    if let Err(rule_errors) = value.validate() {
        for (field, kind) in rule_errors.into_errors() {
            errors.errors_mut().entry(field).or_insert(kind);
        }
    }

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::ValidationError(errors))
    }
}

fn check_shapes(fields: &[FieldSpec], object: &mut Map<String, Value>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for spec in fields {
        if let Err(error) = spec.check(object.get(spec.name)) {
            errors.add(spec.name, error);
            object.insert(spec.name.to_string(), spec.kind.placeholder());
        }
    }
    errors
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::InvalidPayload(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => AppError::BadRequest(anyhow::anyhow!(e.body_text())),
        JsonRejection::MissingJsonContentType(e) => AppError::UnsupportedMediaType(e.body_text()),
        other => AppError::BadRequest(anyhow::anyhow!(other.body_text())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
        routing::post,
    };
    use serde::Deserialize;
    use serde_json::json;
    use tower::util::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Invalid email address"))]
        email: String,
        note: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    }

    impl PayloadSchema for Payload {
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::required("name", FieldKind::Text),
            FieldSpec::required("email", FieldKind::Text),
            FieldSpec::optional("note", FieldKind::Text),
            FieldSpec::defaulted("tags", FieldKind::TextList),
        ];
    }

    async fn handler(ValidatedJson(payload): ValidatedJson<Payload>) -> String {
        payload.name
    }

    async fn send(body: &str, content_type: Option<&str>) -> StatusCode {
        let app = Router::new().route("/", post(handler));
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
            .status()
    }

    fn field_errors(body: Value) -> Vec<(String, String)> {
        let Err(AppError::ValidationError(errors)) = parse_payload::<Payload>(body) else {
            panic!("expected a validation error");
        };
        let mut found: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs[0].code.to_string()))
            .collect();
        found.sort();
        found
    }

    #[tokio::test]
    async fn accepts_valid_payload() {
        let status = send(
            r#"{"name":"venue","email":"a@b.com"}"#,
            Some("application/json"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn rule_violation_is_unprocessable() {
        let status = send(r#"{"name":"","email":"a@b.com"}"#, Some("application/json")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn wrong_type_is_unprocessable() {
        let status = send(r#"{"name":42,"email":"a@b.com"}"#, Some("application/json")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn non_object_body_is_unprocessable() {
        let status = send(r#"["name"]"#, Some("application/json")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let status = send(r#"{"name":"#, Some("application/json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_rejected() {
        let status = send(r#"{"name":"venue","email":"a@b.com"}"#, None).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn every_missing_field_is_reported() {
        assert_eq!(
            field_errors(json!({})),
            vec![
                ("email".to_string(), "required".to_string()),
                ("name".to_string(), "required".to_string()),
            ]
        );
    }

    #[test]
    fn shape_and_rule_failures_are_reported_together() {
        let found = field_errors(json!({ "name": "", "email": 7, "tags": ["a", 1] }));
        assert_eq!(
            found,
            vec![
                ("email".to_string(), "type".to_string()),
                ("name".to_string(), "length".to_string()),
                ("tags".to_string(), "type".to_string()),
            ]
        );
    }

    #[test]
    fn null_is_only_accepted_for_optional_fields() {
        let payload = parse_payload::<Payload>(
            json!({ "name": "venue", "email": "a@b.com", "note": null }),
        )
        .unwrap();
        assert_eq!(payload.note, None);
        assert!(payload.tags.is_empty());

        let found = field_errors(json!({ "name": null, "email": "a@b.com", "tags": null }));
        assert_eq!(
            found,
            vec![
                ("name".to_string(), "type".to_string()),
                ("tags".to_string(), "type".to_string()),
            ]
        );
    }
}
