//! Bridge from `validator` derive checks to [`CoreError`].

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// Run derive-based validation, flattening failures into one message.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Render validation errors as `field: message` pairs, sorted by field.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list
                .iter()
                .map(|e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{field}: {msg}")
                })
                .collect::<Vec<_>>(),
            ValidationErrorsKind::Struct(inner) => vec![format!("{field}: {}", describe(inner))],
            ValidationErrorsKind::List(_) => vec![format!("{field}: invalid entries")],
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(range(min = 1900, max = 2100))]
        year: i32,
    }

    #[test]
    fn valid_input_passes() {
        let input = Sample {
            name: "Camry".into(),
            year: 2020,
        };
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn failures_are_listed_by_field() {
        let input = Sample {
            name: String::new(),
            year: 1800,
        };
        let err = validate_input(&input).unwrap_err();
        assert_matches!(&err, CoreError::Validation(msg) if msg == "name: must not be empty; year: range");
    }
}
