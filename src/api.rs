use std::fmt::Display;

use super::handlers;
use super::request;
use super::response;
use super::response::AuthError;
use super::validations;
use super::Data;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::ResponseError;

#[derive(Debug, Clone)]
pub enum AppError {
    Auth(AuthError),
    Validation(Vec<response::FieldError>),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Auth(e) => e.fmt(f),
            AppError::Validation(errors) => {
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", e.field, e.message)?;
                }
                Ok(())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Auth(e) => HttpResponse::build(self.status_code()).json(e),
            AppError::Validation(errors) => HttpResponse::build(self.status_code()).json(errors),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => match e {
                AuthError::UserExistent => StatusCode::CONFLICT,
                AuthError::UserNonexistent
                | AuthError::UserInactive
                | AuthError::PendingRegistrationNonexistent
                | AuthError::OtpNonexistent
                | AuthError::OtpTimedOut
                | AuthError::PasswordInsecure
                | AuthError::PasswordIncorrect
                | AuthError::EmailBounced => StatusCode::BAD_REQUEST,
                AuthError::TokenNonexistent | AuthError::TokenUnauthorized => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::DeliveryFailed => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

fn validated(errors: Vec<response::FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

// respond with info about stuff
pub async fn info() -> Result<impl Responder, AppError> {
    Ok(web::Json(response::Info {
        service: String::from(crate::SERVICE_NAME),
        version_major: crate::VERSION_MAJOR,
        version_minor: crate::VERSION_MINOR,
        version_rev: crate::VERSION_REV,
    }))
}

pub async fn register_submit(
    data: web::Data<Data>,
    props: web::Json<request::RegisterSubmitProps>,
) -> Result<impl Responder, AppError> {
    let props = props.into_inner();
    validated(validations::validate_register_submit(&props))?;
    Ok(web::Json(handlers::register_submit(data.get_ref(), props).await?))
}

pub async fn register_verify(
    data: web::Data<Data>,
    props: web::Json<request::RegisterVerifyProps>,
) -> Result<impl Responder, AppError> {
    let props = props.into_inner();
    validated(validations::validate_register_verify(&props))?;
    Ok(web::Json(handlers::register_verify(data.get_ref(), props).await?))
}

pub async fn register_resend(
    data: web::Data<Data>,
    props: web::Json<request::RegisterResendProps>,
) -> Result<impl Responder, AppError> {
    let props = props.into_inner();
    validated(validations::validate_email_only(&props.email))?;
    Ok(web::Json(handlers::register_resend(data.get_ref(), props).await?))
}

pub async fn login(
    data: web::Data<Data>,
    props: web::Json<request::LoginProps>,
) -> Result<impl Responder, AppError> {
    let props = props.into_inner();
    validated(validations::validate_login(&props))?;
    Ok(web::Json(handlers::login(data.get_ref(), props).await?))
}

pub async fn forgot_password(
    data: web::Data<Data>,
    props: web::Json<request::ForgotPasswordProps>,
) -> Result<impl Responder, AppError> {
    let props = props.into_inner();
    validated(validations::validate_email_only(&props.email))?;

    // mask unknown addresses so the endpoint cannot be used to enumerate accounts
    match handlers::forgot_password(data.get_ref(), props).await {
        Ok(()) | Err(AuthError::UserNonexistent) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(web::Json(response::Message {
        message: String::from(
            "If the address matches an account, a password reset code has been sent.",
        ),
    }))
}

pub async fn reset_otp_verify(
    data: web::Data<Data>,
    props: web::Json<request::ResetOtpVerifyProps>,
) -> Result<impl Responder, AppError> {
    let props = props.into_inner();
    validated(validations::validate_reset_otp_verify(&props))?;
    handlers::reset_otp_verify(data.get_ref(), props).await?;
    Ok(web::Json(response::Message {
        message: String::from("Reset code is valid."),
    }))
}

pub async fn reset_password(
    data: web::Data<Data>,
    props: web::Json<request::ResetPasswordProps>,
) -> Result<impl Responder, AppError> {
    let props = props.into_inner();
    validated(validations::validate_reset_password(&props))?;
    handlers::reset_password(data.get_ref(), props).await?;
    Ok(web::Json(response::Message {
        message: String::from("Password reset successful. You can now log in."),
    }))
}

pub async fn logout(
    data: web::Data<Data>,
    props: web::Json<request::LogoutProps>,
) -> Result<impl Responder, AppError> {
    handlers::logout(data.get_ref(), props.into_inner()).await?;
    Ok(web::Json(response::Message {
        message: String::from("Logged out."),
    }))
}

pub async fn token_refresh(
    data: web::Data<Data>,
    props: web::Json<request::TokenRefreshProps>,
) -> Result<impl Responder, AppError> {
    Ok(web::Json(
        handlers::token_refresh(data.get_ref(), props.into_inner()).await?,
    ))
}

pub async fn user_me(
    data: web::Data<Data>,
    props: web::Json<request::UserMeProps>,
) -> Result<impl Responder, AppError> {
    Ok(web::Json(handlers::user_me(data.get_ref(), props.into_inner()).await?))
}
