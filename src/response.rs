//! JSON error envelope shared by every module:
//! `{ "error": "...", "details": [{ "field": "...", "message": "..." }] }`.

use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
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
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

/// Flattens `validator` output into one entry per failed rule, sorted by
/// field so responses are stable.
pub fn validation_details(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details = Vec::new();
    collect(errors, None, &mut details);
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(items) => {
                for item in items {
                    let message = item
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", item.code));
                    out.push(FieldError::new(camel_case(&name), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&name), out),
            ValidationErrorsKind::List(map) => {
                for (index, inner) in map {
                    collect(inner, Some(&format!("{}[{}]", name, index)), out);
                }
            }
        }
    }
}

/// Request bodies are camelCase on the wire, Rust fields are snake_case.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
