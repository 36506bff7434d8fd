//! Field checks run on form submission.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::UiConfig;

// Same shape the browser side always accepted: something@something.something,
// no whitespace and no extra `@`.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Required,
    InvalidEmail,
    PasswordMismatch,
}

impl FieldProblem {
    pub fn message(self, config: &UiConfig) -> &str {
        match self {
            FieldProblem::Required => &config.messages.required,
            FieldProblem::InvalidEmail => &config.messages.invalid_email,
            FieldProblem::PasswordMismatch => &config.messages.password_mismatch,
        }
    }
}

pub fn check_required(value: &str) -> Option<FieldProblem> {
    value.trim().is_empty().then_some(FieldProblem::Required)
}

/// Empty values pass; emptiness is the `required` check's job.
pub fn check_email(value: &str) -> Option<FieldProblem> {
    if value.is_empty() || is_email_shaped(value) {
        None
    } else {
        Some(FieldProblem::InvalidEmail)
    }
}

pub fn check_confirmation(password: &str, confirmation: &str) -> Option<FieldProblem> {
    (password != confirmation).then_some(FieldProblem::PasswordMismatch)
}

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}
