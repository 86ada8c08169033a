//! Input schemas.
//!
//! Every create/update payload arrives as untyped JSON. `validate_payload` turns it into a
//! typed record or a `ValidationError` listing each offending field:
//!
//! 1. the body must be a JSON object;
//! 2. every field in `Schema::REQUIRED` must be present and non-null (all missing fields are
//!    reported together);
//! 3. the object must deserialize into the record type (a mismatch names the offending field);
//! 4. the record's `validator` rules must hold (positive amounts, email shape, lengths).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// Pseudo field name used when the failure concerns the body as a whole.
pub const BODY_FIELD: &str = "<body>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    /// Short machine-readable name of the violated rule (`required`, `type`, `email`, ...).
    pub constraint: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.into(),
                constraint: constraint.into(),
                message: message.into(),
            }],
        }
    }

    /// Raised when a partial update carries no field to change.
    pub fn empty_update() -> Self {
        Self::single(
            BODY_FIELD,
            "non_empty",
            "at least one updatable field must be provided",
        )
    }

    #[cfg(test)]
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for ValidationError {
    fn from(errs: ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, violations)| {
                let field = field.to_string();
                violations.iter().map(move |v| FieldError {
                    field: field.clone(),
                    constraint: v.code.to_string(),
                    message: v
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed `{}` check", v.code)),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors }
    }
}

/// A typed input record for one resource/operation pair.
pub trait Schema: DeserializeOwned + Validate {
    /// Fields that must be present and non-null. Empty for partial-update schemas.
    const REQUIRED: &'static [&'static str];
}

/// Validates an untyped payload against `S`.
pub fn validate_payload<S: Schema>(payload: JsonValue) -> Result<S, ValidationError> {
    {
        let obj = payload.as_object().ok_or_else(|| {
            ValidationError::single(BODY_FIELD, "object", "request body must be a JSON object")
        })?;

        let missing: Vec<FieldError> = S::REQUIRED
            .iter()
            .filter(|field| obj.get(**field).map_or(true, JsonValue::is_null))
            .map(|field| FieldError {
                field: field.to_string(),
                constraint: "required".to_string(),
                message: "field is required".to_string(),
            })
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError { errors: missing });
        }
    }

    let record: S = serde_path_to_error::deserialize(payload).map_err(|e| {
        let field = match e.path().to_string() {
            path if path == "." => BODY_FIELD.to_string(),
            path => path,
        };
        ValidationError::single(field, "type", e.into_inner().to_string())
    })?;
    record.validate()?;
    Ok(record)
}

/// `validator` rule: money amounts must be strictly positive.
pub fn positive_amount(value: &rust_decimal::Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("positive")
            .with_message(Cow::Borrowed("must be greater than zero")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        NewCatalogProduct, NewOrder, NewProduct, NewUser, ProductPatch, UserPatch,
    };
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn create_accepts_complete_payload() {
        let p: NewProduct =
            validate_payload(json!({"name": "Widget", "about": "A widget", "price": 9.99})).unwrap();
        assert_eq!(p.name, "Widget");
        assert_eq!(p.price, Decimal::from_str("9.99").unwrap());
    }

    #[test]
    fn create_reports_every_missing_field() {
        let err = validate_payload::<NewProduct>(json!({"about": null})).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "about", "price"]);
        assert!(err.errors.iter().all(|e| e.constraint == "required"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate_payload::<NewProduct>(json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.errors[0].field, BODY_FIELD);
        assert_eq!(err.errors[0].constraint, "object");
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err =
            validate_payload::<NewOrder>(json!({"user_id": 1, "product_id": 2, "quantity": "two"}))
                .unwrap_err();
        assert_eq!(err.fields(), vec!["quantity"]);
        assert_eq!(err.errors[0].constraint, "type");

        let err = validate_payload::<NewCatalogProduct>(json!({
            "name": "Rake",
            "description": "Leaf rake",
            "price": 15,
            "categories": ["not-a-uuid"]
        }))
        .unwrap_err();
        assert_eq!(err.fields(), vec!["categories[0]"]);
        assert_eq!(err.errors[0].constraint, "type");
    }

    #[test]
    fn price_and_quantity_must_be_positive() {
        let err = validate_payload::<NewProduct>(json!({"name": "W", "about": "x", "price": 0}))
            .unwrap_err();
        assert_eq!(err.fields(), vec!["price"]);
        assert_eq!(err.errors[0].constraint, "positive");

        let err =
            validate_payload::<NewOrder>(json!({"user_id": 1, "product_id": 2, "quantity": 0}))
                .unwrap_err();
        assert_eq!(err.fields(), vec!["quantity"]);
    }

    #[test]
    fn user_rules_are_enforced_together() {
        let err = validate_payload::<NewUser>(
            json!({"name": "Ada", "email": "not-an-email", "password": "short"}),
        )
        .unwrap_err();
        assert_eq!(err.fields(), vec!["email", "password"]);
    }

    #[test]
    fn partial_update_accepts_empty_object() {
        let patch: UserPatch = validate_payload(json!({})).unwrap();
        assert!(patch.name.is_none() && patch.email.is_none() && patch.password.is_none());
    }

    #[test]
    fn partial_update_still_checks_present_fields() {
        let err = validate_payload::<ProductPatch>(json!({"price": -1})).unwrap_err();
        assert_eq!(err.fields(), vec!["price"]);

        let err = validate_payload::<UserPatch>(json!({"email": "nope"})).unwrap_err();
        assert_eq!(err.fields(), vec!["email"]);
    }
}
