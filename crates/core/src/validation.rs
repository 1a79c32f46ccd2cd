//! Bridge from `validator` derive output to [`CoreError`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run the derived validation rules on `input`.
///
/// Field failures are flattened into one message, sorted by field name so
/// responses are stable.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, failures)| {
            let reasons: Vec<String> = failures
                .iter()
                .map(|f| {
                    f.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| f.code.to_string())
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
