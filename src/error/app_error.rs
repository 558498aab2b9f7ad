use serde::Serialize;
use thiserror::Error;

/// A single field failure reported by request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

/// Application-wide error type.
///
/// Cache failures never appear here; the cache layer absorbs them. What does
/// appear are failures of the computations the cache memoizes (upstream API
/// calls, text generation) and bad client input.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Request body failed field validation
    #[error("Validation failed: {} field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// An upstream service (GitHub, text generation) failed
    #[error("External API error ({service}): {message}")]
    ExternalApi {
        service: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A required setting is missing or unusable
    #[error("Configuration error: {key}: {message}")]
    Configuration { key: String, message: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn not_found(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        AppError::NotFound {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    pub fn external(
        service: impl Into<String>,
        message: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        AppError::ExternalApi {
            service: service.into(),
            message: message.into(),
            source,
        }
    }

    pub fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut collected = Vec::new();
        collect_field_errors("", &errors, &mut collected);
        collected.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationErrors { errors: collected }
    }
}

/// Flatten nested struct and list errors into dotted field paths.
fn collect_field_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<ValidationFieldError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                out.extend(failures.iter().map(|failure| ValidationFieldError {
                    field: path.clone(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1))]
        number: u64,
    }

    #[test]
    fn test_validation_errors_conversion() {
        let sample = Sample {
            name: String::new(),
            number: 0,
        };
        let error: AppError = sample.validate().unwrap_err().into();

        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[0].message, "name is required");
                assert_eq!(errors[1].field, "number");
                assert_eq!(errors[1].message, "range");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[derive(Validate)]
    struct Batch {
        #[validate(nested)]
        items: Vec<Sample>,
    }

    #[test]
    fn test_nested_errors_get_paths() {
        let batch = Batch {
            items: vec![
                Sample {
                    name: "ok".to_string(),
                    number: 1,
                },
                Sample {
                    name: String::new(),
                    number: 1,
                },
            ],
        };
        let error: AppError = batch.validate().unwrap_err().into();

        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "items[1].name");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AppError::not_found("Repository", "full_name", "a/b").to_string(),
            "Resource not found: Repository with full_name=a/b"
        );
        assert_eq!(
            AppError::external("github", "HTTP 502", None).to_string(),
            "External API error (github): HTTP 502"
        );
    }
}
