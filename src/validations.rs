//! Pure request-shape validators, run by the API layer before any flow.
//!
//! These only check structure (presence, format, confirmation match);
//! semantic rules like password strength or email uniqueness stay in the
//! flows themselves.

use super::request;
use super::response::FieldError;
use super::utils;

fn err(field: &str, message: &str) -> FieldError {
    FieldError {
        field: field.to_owned(),
        message: message.to_owned(),
    }
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if !utils::is_email_valid(&utils::normalize_email(email)) {
        errors.push(err("email", "enter a valid email address"));
    }
}

fn check_otp_code(errors: &mut Vec<FieldError>, code: &str) {
    if !utils::is_otp_code_valid(code) {
        errors.push(err("otp_code", "code must be exactly 4 digits"));
    }
}

pub fn validate_register_submit(props: &request::RegisterSubmitProps) -> Vec<FieldError> {
    let mut errors = vec![];
    check_email(&mut errors, &props.email);
    if !utils::is_name_valid(&props.name) {
        errors.push(err("name", "name must be between 1 and 100 characters"));
    }
    if props.password.is_empty() {
        errors.push(err("password", "password is required"));
    }
    if props.password != props.password_confirmation {
        errors.push(err("password", "password fields didn't match"));
    }
    errors
}

pub fn validate_register_verify(props: &request::RegisterVerifyProps) -> Vec<FieldError> {
    let mut errors = vec![];
    check_email(&mut errors, &props.email);
    check_otp_code(&mut errors, &props.otp_code);
    errors
}

pub fn validate_email_only(email: &str) -> Vec<FieldError> {
    let mut errors = vec![];
    check_email(&mut errors, email);
    errors
}

pub fn validate_login(props: &request::LoginProps) -> Vec<FieldError> {
    let mut errors = vec![];
    check_email(&mut errors, &props.email);
    if props.password.is_empty() {
        errors.push(err("password", "password is required"));
    }
    errors
}

pub fn validate_reset_otp_verify(props: &request::ResetOtpVerifyProps) -> Vec<FieldError> {
    let mut errors = vec![];
    check_email(&mut errors, &props.email);
    check_otp_code(&mut errors, &props.otp_code);
    errors
}

pub fn validate_reset_password(props: &request::ResetPasswordProps) -> Vec<FieldError> {
    let mut errors = vec![];
    check_email(&mut errors, &props.email);
    check_otp_code(&mut errors, &props.otp_code);
    if props.new_password.is_empty() {
        errors.push(err("new_password", "password is required"));
    }
    if props.new_password != props.new_password_confirmation {
        errors.push(err("new_password", "password fields didn't match"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_submit_collects_field_errors() {
        let props = request::RegisterSubmitProps {
            email: "not-an-email".to_owned(),
            name: "".to_owned(),
            password: "Secret123!".to_owned(),
            password_confirmation: "Different1".to_owned(),
        };

        let errors = validate_register_submit(&props);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn well_formed_register_submit_passes() {
        let props = request::RegisterSubmitProps {
            email: "a@x.com".to_owned(),
            name: "A".to_owned(),
            password: "Secret123!".to_owned(),
            password_confirmation: "Secret123!".to_owned(),
        };

        assert!(validate_register_submit(&props).is_empty());
    }

    #[test]
    fn otp_code_shape_is_enforced() {
        let props = request::RegisterVerifyProps {
            email: "a@x.com".to_owned(),
            otp_code: "12a4".to_owned(),
        };
        assert_eq!(validate_register_verify(&props).len(), 1);

        let props = request::RegisterVerifyProps {
            email: "a@x.com".to_owned(),
            otp_code: "12345".to_owned(),
        };
        assert_eq!(validate_register_verify(&props).len(), 1);
    }
}
