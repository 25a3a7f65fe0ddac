use std::collections::HashMap;

use crate::error::ApiError;
use crate::types::Choice;

/// Collects per-field validation failures for one request body
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push((field.to_string(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Required string that must contain something besides whitespace
    pub fn required_text(&mut self, field: &str, label: &str, value: Option<String>) -> Option<String> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.add(field, format!("{} is required and must be a non-empty string", label));
                None
            }
        }
    }

    /// Optional string that, when present, must not be blank
    pub fn non_blank(&mut self, field: &str, label: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if v.trim().is_empty() => {
                self.add(field, format!("{} must be a non-empty string", label));
                None
            }
            other => other.map(|v| v.trim().to_string()),
        }
    }

    /// Enum value matched case-insensitively against the wire names
    pub fn choice<T: Choice>(&mut self, field: &str, label: &str, value: &str) -> Option<T> {
        let parsed = T::parse(&value.trim().to_ascii_lowercase());
        if parsed.is_none() {
            self.add(field, format!("{} must be one of: {}", label, T::allowed()));
        }
        parsed
    }

    pub fn positive(&mut self, field: &str, label: &str, value: f64) -> Option<f64> {
        if value.is_finite() && value > 0.0 {
            Some(value)
        } else {
            self.add(field, format!("{} must be a positive number", label));
            None
        }
    }

    pub fn non_negative(&mut self, field: &str, label: &str, value: f64) -> Option<f64> {
        if value.is_finite() && value >= 0.0 {
            Some(value)
        } else {
            self.add(field, format!("{} must be a non-negative number", label));
            None
        }
    }

    pub fn non_negative_int(&mut self, field: &str, label: &str, value: i64) -> Option<i64> {
        if value >= 0 {
            Some(value)
        } else {
            self.add(field, format!("{} must be a non-negative number", label));
            None
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Ok(());
        }

        let message = self
            .errors
            .iter()
            .map(|(_, m)| m.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let field_errors: HashMap<String, String> = self.errors.into_iter().collect();
        Err(ApiError::validation_error(message, Some(field_errors)))
    }
}
