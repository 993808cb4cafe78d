use validator::{ValidationError, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";

pub fn error_with_message(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into().into());
    error
}

pub fn field_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<String>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error_with_message(code, message));
    errors
}

/// Unwraps a field that may be omitted but never sent as null. `required`
/// also records an error when it is omitted.
pub fn take_non_null<T>(
    value: Option<Option<T>>,
    field: &'static str,
    required: bool,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match value {
        Some(Some(value)) => Some(value),
        Some(None) => {
            errors.add(field, error_with_message("null", NOT_NULL));
            None
        }
        None => {
            if required {
                errors.add(field, error_with_message("required", REQUIRED));
            }
            None
        }
    }
}

pub fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
