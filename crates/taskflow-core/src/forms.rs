//! Client-side form validation.
//!
//! Every field check yields a discriminated [`FieldCheck`], and a form
//! validation aggregates the failures per field. Validation runs before any
//! network call; an invalid form never builds a request.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::RegisterRequest;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));
static UPPERCASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static LOWERCASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").expect("valid regex"));
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));
static SPECIAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]").expect("valid regex"));

/// Outcome of a single field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Valid,
    Invalid { message: String },
}

impl FieldCheck {
    fn invalid(message: impl Into<String>) -> Self {
        FieldCheck::Invalid {
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FieldCheck::Valid)
    }
}

/// A failed check attributed to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Aggregated validation failures for a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Returns the message recorded for a field, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collects field checks and turns them into a validation result.
#[derive(Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn field(&mut self, field: &'static str, check: FieldCheck) {
        if let FieldCheck::Invalid { message } = check {
            self.errors.push(FieldError { field, message });
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

/// Checks that a value is non-empty after trimming.
pub fn check_required(label: &str, value: &str) -> FieldCheck {
    if value.trim().is_empty() {
        FieldCheck::invalid(format!("{label} is required"))
    } else {
        FieldCheck::Valid
    }
}

fn check_username(value: &str) -> FieldCheck {
    let len = value.chars().count();
    if len < 2 {
        FieldCheck::invalid("Username must be at least 2 characters")
    } else if len > 50 {
        FieldCheck::invalid("Username must be less than 50 characters")
    } else {
        FieldCheck::Valid
    }
}

fn check_email(value: &str) -> FieldCheck {
    if EMAIL_RE.is_match(value) {
        FieldCheck::Valid
    } else {
        FieldCheck::invalid("Invalid email address")
    }
}

fn check_password(value: &str) -> FieldCheck {
    if value.chars().count() < 8 {
        FieldCheck::invalid("Password must be at least 8 characters")
    } else if !UPPERCASE_RE.is_match(value) {
        FieldCheck::invalid("Password must contain an uppercase letter")
    } else if !LOWERCASE_RE.is_match(value) {
        FieldCheck::invalid("Password must contain a lowercase letter")
    } else if !DIGIT_RE.is_match(value) {
        FieldCheck::invalid("Password must contain a number")
    } else if !SPECIAL_RE.is_match(value) {
        FieldCheck::invalid("Password must contain a special character")
    } else {
        FieldCheck::Valid
    }
}

fn check_name(label: &str, value: &str) -> FieldCheck {
    if value.chars().count() < 2 {
        FieldCheck::invalid(format!("{label} is required"))
    } else {
        FieldCheck::Valid
    }
}

/// Login credentials as entered.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::default();
        checks.field("username", check_required("Username", &self.username));
        checks.field("password", check_required("Password", &self.password));
        checks.finish()
    }
}

/// Registration fields as entered, including the confirmation that never
/// leaves the client.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub firstname: String,
    pub lastname: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::default();
        checks.field("username", check_username(&self.username));
        checks.field("email", check_email(&self.email));
        checks.field("password", check_password(&self.password));
        if self.password == self.confirm_password {
            checks.field("confirmPassword", FieldCheck::Valid);
        } else {
            checks.field(
                "confirmPassword",
                FieldCheck::invalid("Passwords don't match"),
            );
        }
        checks.field("firstname", check_name("First name", &self.firstname));
        checks.field("lastname", check_name("Last name", &self.lastname));
        checks.finish()
    }

    /// Drops the confirmation and produces the request body the server
    /// expects.
    pub fn into_payload(self) -> RegisterRequest {
        RegisterRequest {
            email: self.email,
            username: self.username,
            password: self.password,
            firstname: self.firstname,
            lastname: self.lastname,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_form() -> RegisterForm {
        RegisterForm {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1A!".to_string(),
            confirm_password: "secret1A!".to_string(),
            firstname: "Alice".to_string(),
            lastname: "Doe".to_string(),
        }
    }

    #[test]
    fn test_valid_register_form_passes() {
        assert!(valid_register_form().validate().is_ok());
    }

    #[test]
    fn test_mismatched_confirmation_fails_on_its_own_field() {
        let mut form = valid_register_form();
        form.confirm_password = "different1A!".to_string();

        let err = form.validate().unwrap_err();
        assert_eq!(
            err.message_for("confirmPassword"),
            Some("Passwords don't match")
        );
    }

    #[test]
    fn test_password_rules_report_first_unmet_rule() {
        let mut form = valid_register_form();
        form.password = "alllowercase1!".to_string();
        form.confirm_password = form.password.clone();

        let err = form.validate().unwrap_err();
        assert_eq!(
            err.message_for("password"),
            Some("Password must contain an uppercase letter")
        );
    }

    #[test]
    fn test_short_password_rejected() {
        let mut form = valid_register_form();
        form.password = "aB1!".to_string();
        form.confirm_password = form.password.clone();

        let err = form.validate().unwrap_err();
        assert_eq!(
            err.message_for("password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_invalid_email_and_short_names_collected_together() {
        let form = RegisterForm {
            username: "a".to_string(),
            email: "not-an-email".to_string(),
            firstname: "A".to_string(),
            lastname: String::new(),
            ..valid_register_form()
        };

        let err = form.validate().unwrap_err();
        assert_eq!(err.errors.len(), 4);
        assert_eq!(err.message_for("email"), Some("Invalid email address"));
        assert_eq!(
            err.message_for("username"),
            Some("Username must be at least 2 characters")
        );
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let form = LoginForm {
            username: String::new(),
            password: "x".to_string(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.message_for("username"), Some("Username is required"));
        assert!(err.message_for("password").is_none());
    }

    #[test]
    fn test_payload_drops_confirmation() {
        let payload = valid_register_form().into_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("confirmPassword").is_none());
        assert_eq!(json["username"], "alice");
    }
}
