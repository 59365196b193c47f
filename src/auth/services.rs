use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{LoginRequest, RegisterRequest};
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Shape checks for registration. The email is kept exactly as submitted;
/// uniqueness is case-sensitive downstream.
pub(crate) fn check_registration(payload: &RegisterRequest) -> Result<(), ApiError> {
    if payload.email.is_empty()
        || payload.password.is_empty()
        || payload.confirm_password.is_empty()
    {
        return Err(ApiError::MissingField);
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::InvalidEmail);
    }
    if payload.password != payload.confirm_password {
        return Err(ApiError::PasswordMismatch);
    }
    Ok(())
}

pub(crate) fn check_login(payload: &LoginRequest) -> Result<(), ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::MissingField);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@x"));
    }

    #[test]
    fn registration_requires_all_fields() {
        for payload in [
            registration("", "p1", "p1"),
            registration("a@x.com", "", "p1"),
            registration("a@x.com", "p1", ""),
        ] {
            let err = check_registration(&payload).unwrap_err();
            assert!(matches!(err, ApiError::MissingField));
        }
    }

    #[test]
    fn registration_rejects_password_mismatch() {
        let err = check_registration(&registration("a@x.com", "p1", "p2")).unwrap_err();
        assert!(matches!(err, ApiError::PasswordMismatch));
    }

    #[test]
    fn registration_accepts_short_passwords() {
        // Any non-empty password is acceptable; there is no length policy.
        assert!(check_registration(&registration("a@x.com", "p1", "p1")).is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        let err = check_login(&LoginRequest {
            email: "a@x.com".into(),
            password: "".into(),
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::MissingField));
    }
}
