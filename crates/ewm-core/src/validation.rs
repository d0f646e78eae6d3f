//! Input validation helpers shared by the request types.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{EwmError, Result};

/// Rejects strings that are empty or whitespace only.
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

/// Runs `validator` on `input` and reports the first failing field.
pub fn validate<T: Validate>(input: &T) -> Result<()> {
    input.validate().map_err(EwmError::from)
}

impl From<ValidationErrors> for EwmError {
    fn from(errors: ValidationErrors) -> Self {
        let message = first_error(&errors, "")
            .unwrap_or_else(|| "request failed validation".to_string());
        EwmError::Validation(message)
    }
}

fn first_error(errors: &ValidationErrors, prefix: &str) -> Option<String> {
    // HashMap order is random; sort so the reported field is stable.
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields.into_iter().find_map(|(field, kind)| {
        let path = format!("{prefix}{field}");
        match kind {
            ValidationErrorsKind::Field(errs) => errs
                .first()
                .map(|e| format!("{path}: {}", describe(e))),
            ValidationErrorsKind::Struct(inner) => first_error(inner, &format!("{path}.")),
            ValidationErrorsKind::List(items) => items
                .iter()
                .find_map(|(i, inner)| first_error(inner, &format!("{path}[{i}]."))),
        }
    })
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| error.params.get(name).map(|v| v.to_string());
    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "invalid length".to_string(),
        },
        "email" => "must be a well-formed email address".to_string(),
        "range" => match (param("min"), param("max")) {
            (Some(min), _) => format!("must be greater than or equal to {min}"),
            (None, Some(max)) => format!("must be less than or equal to {max}"),
            (None, None) => "out of range".to_string(),
        },
        code => format!("failed '{code}' check"),
    }
}
