use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthError {
    UserExistent,
    UserNonexistent,
    UserInactive,
    PendingRegistrationNonexistent,
    OtpNonexistent,
    OtpTimedOut,
    PasswordInsecure,
    PasswordIncorrect,
    EmailBounced,
    DeliveryFailed,
    TokenNonexistent,
    TokenUnauthorized,
    InternalServerError,
    Unknown,
}

impl AuthError {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthError::UserExistent => "USER_EXISTENT",
            AuthError::UserNonexistent => "USER_NONEXISTENT",
            AuthError::UserInactive => "USER_INACTIVE",
            AuthError::PendingRegistrationNonexistent => "PENDING_REGISTRATION_NONEXISTENT",
            AuthError::OtpNonexistent => "OTP_NONEXISTENT",
            AuthError::OtpTimedOut => "OTP_TIMED_OUT",
            AuthError::PasswordInsecure => "PASSWORD_INSECURE",
            AuthError::PasswordIncorrect => "PASSWORD_INCORRECT",
            AuthError::EmailBounced => "EMAIL_BOUNCED",
            AuthError::DeliveryFailed => "DELIVERY_FAILED",
            AuthError::TokenNonexistent => "TOKEN_NONEXISTENT",
            AuthError::TokenUnauthorized => "TOKEN_UNAUTHORIZED",
            AuthError::InternalServerError => "INTERNAL_SERVER_ERROR",
            AuthError::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Info {
    pub service: String,
    pub version_major: i64,
    pub version_minor: i64,
    pub version_rev: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub creation_time: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub creation_time: i64,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub duration: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}
