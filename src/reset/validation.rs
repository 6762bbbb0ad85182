use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Field name -> messages, in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.values().flatten().cloned().collect()
    }

    /// First message overall, used as the summary line in responses.
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().flatten().next().map(String::as_str)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.add("email", "The email field is required.");
    } else if !is_valid_email(email) {
        errors.add("email", "The email field must be a valid email address.");
    }
}

pub fn forgot_password(email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, email);
    errors.into_result()
}

pub fn reset_password(
    email: &str,
    token: &str,
    password: &str,
    password_confirmation: &str,
    min_password_length: usize,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, email);

    if token.trim().is_empty() {
        errors.add("token", "The token field is required.");
    }

    if password.is_empty() {
        errors.add("password", "The password field is required.");
    } else {
        if password.chars().count() < min_password_length {
            errors.add(
                "password",
                format!("The password field must be at least {min_password_length} characters."),
            );
        }
        if password != password_confirmation {
            errors.add("password", "The password field confirmation does not match.");
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("ax.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@@x.com"));
    }

    #[test]
    fn forgot_password_requires_email() {
        let errors = forgot_password("").unwrap_err();
        assert_eq!(errors.field("email"), ["The email field is required."]);
    }

    #[test]
    fn reset_password_collects_every_failure() {
        let errors = reset_password("nope", "", "abc", "abd", 6).unwrap_err();
        assert_eq!(errors.field("email").len(), 1);
        assert_eq!(errors.field("token").len(), 1);
        assert_eq!(errors.field("password").len(), 2);
    }

    #[test]
    fn reset_password_rejects_mismatched_confirmation() {
        let errors = reset_password("a@x.com", "t", "secret123", "secret124", 6).unwrap_err();
        assert!(errors.field("email").is_empty());
        assert_eq!(
            errors.first_message(),
            Some("The password field confirmation does not match.")
        );
    }

    #[test]
    fn reset_password_accepts_valid_input() {
        assert!(reset_password("a@x.com", "t", "secret", "secret", 6).is_ok());
    }
}
