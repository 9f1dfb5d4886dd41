// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field validation shared by every storage backend.
//!
//! Lengths are counted in Unicode scalar values, not bytes.

use crate::models::{Credentials, NewNote, NoteUpdate};

pub const HEADER_MAX_CHARS: usize = 100;
pub const BODY_MAX_CHARS: usize = 1000;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 100;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Payloads that are checked before they reach a backend.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_required_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = char_len(value);
    if len == 0 {
        errors.push(field, "cannot be blank");
    } else if len < min || len > max {
        errors.push(field, format!("must be between {min} and {max} characters"));
    }
}

impl Validate for NewNote {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_required_length(&mut errors, "header", &self.header, 1, HEADER_MAX_CHARS);
        check_required_length(&mut errors, "body", &self.body, 1, BODY_MAX_CHARS);
        errors.into_result()
    }
}

/// Partial updates only enforce upper bounds; empty fields mean "no change".
impl Validate for NoteUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.header().map(char_len).unwrap_or(0) > HEADER_MAX_CHARS {
            errors.push("header", format!("must be at most {HEADER_MAX_CHARS} characters"));
        }
        if self.body().map(char_len).unwrap_or(0) > BODY_MAX_CHARS {
            errors.push("body", format!("must be at most {BODY_MAX_CHARS} characters"));
        }
        errors.into_result()
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.email.is_empty() {
            errors.push("email", "cannot be blank");
        } else if !is_valid_email(&self.email) {
            errors.push("email", "must be a valid email address");
        }
        check_required_length(
            &mut errors,
            "password",
            &self.password,
            PASSWORD_MIN_CHARS,
            PASSWORD_MAX_CHARS,
        );
        errors.into_result()
    }
}

/// Structural email check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_note_passes() {
        assert!(NewNote::new("header", "body").validate().is_ok());
    }

    #[test]
    fn empty_header_and_body_are_rejected() {
        let errors = NewNote::new("", "").validate().unwrap_err();
        assert!(errors.has_field("header"));
        assert!(errors.has_field("body"));
    }

    #[test]
    fn header_limits_count_characters() {
        assert!(NewNote::new("h".repeat(100), "body").validate().is_ok());
        assert!(NewNote::new("h".repeat(101), "body").validate().is_err());
        // 100 multi-byte characters are still within the limit.
        assert!(NewNote::new("ü".repeat(100), "body").validate().is_ok());
    }

    #[test]
    fn body_limit_is_enforced() {
        assert!(NewNote::new("header", "b".repeat(1000)).validate().is_ok());
        let errors = NewNote::new("header", "b".repeat(1001)).validate().unwrap_err();
        assert!(errors.has_field("body"));
        assert!(!errors.has_field("header"));
    }

    #[test]
    fn update_allows_empty_and_missing_fields() {
        assert!(NoteUpdate::default().validate().is_ok());
        let update = NoteUpdate {
            header: Some(String::new()),
            body: Some("new body".to_string()),
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn update_rejects_oversized_fields() {
        let update = NoteUpdate {
            header: Some("h".repeat(101)),
            body: None,
        };
        let errors = update.validate().unwrap_err();
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(errors.fields()[0].field, "header");
    }

    #[test]
    fn credentials_rules() {
        assert!(Credentials::new("user@example.org", "password").validate().is_ok());
        assert!(Credentials::new("", "password").validate().is_err());
        assert!(Credentials::new("user@example", "password").validate().is_err());
        assert!(Credentials::new("user@@example.org", "password").validate().is_err());
        assert!(Credentials::new("us er@example.org", "password").validate().is_err());
        assert!(Credentials::new("user@example.org", "short").validate().is_err());
        assert!(Credentials::new("user@example.org", "").validate().is_err());
    }

    #[test]
    fn display_lists_every_field() {
        let errors = NewNote::new("", "").validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "header: cannot be blank; body: cannot be blank"
        );
    }
}
