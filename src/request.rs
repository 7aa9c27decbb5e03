use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterSubmitProps {
    pub email: String,
    pub name: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterVerifyProps {
    pub email: String,
    pub otp_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterResendProps {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginProps {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordProps {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetOtpVerifyProps {
    pub email: String,
    pub otp_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetPasswordProps {
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogoutProps {
    pub refresh_token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenRefreshProps {
    pub refresh_token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserMeProps {
    pub access_token: String,
}
