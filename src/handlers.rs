use super::db_types::{OtpKind, SessionToken, TokenKind, User};
use super::response::{self, AuthError};
use super::Config;
use super::Data;

use super::mail_client::{MailClient, MailError, MailNewProps};
use super::otp_service::{self, OtpVerification};
use super::pending_registration_service;
use super::token_service;
use super::user_service;
use super::utils;

use rusqlite::Connection;

fn report_internal_err<E: std::error::Error>(e: E) -> AuthError {
    log::error!("{}", e);
    AuthError::Unknown
}

fn report_sqlite_err(e: rusqlite::Error) -> AuthError {
    log::error!("{}", e);
    AuthError::InternalServerError
}

fn report_mail_err(e: MailError) -> AuthError {
    let ae = match e {
        // the service took the request and refused the address
        MailError::Rejected(status) if status < 500 => AuthError::EmailBounced,
        _ => AuthError::DeliveryFailed,
    };
    log::warn!("{}", e);
    ae
}

fn fill_user(user: User) -> response::User {
    response::User {
        user_id: user.user_id,
        creation_time: user.creation_time,
        name: user.name,
        email: user.email,
        is_active: user.is_active,
    }
}

fn fill_pending_registration(
    pending: super::db_types::PendingRegistration,
) -> response::PendingRegistration {
    response::PendingRegistration {
        creation_time: pending.creation_time,
        name: pending.name,
        email: pending.email,
    }
}

async fn send_verification_email(
    mail_client: &MailClient,
    target_email: &str,
    user_name: &str,
    config: &Config,
    otp_code: &str,
) -> Result<(), AuthError> {
    mail_client
        .mail_new(MailNewProps {
            destination: target_email.to_owned(),
            topic: "email_verification".to_owned(),
            title: format!("{}: Email Verification", config.site_name),
            content: [
                &format!("<p>Hello {},</p>", user_name),
                &format!(
                    "<p>Your email verification code is: <code>{}</code></p>",
                    otp_code
                ),
                &format!(
                    "<p>This code is valid for up to {} minutes.</p>",
                    config.registration_otp_ttl / 60_000
                ),
                "<p>If you did not make this request, then feel free to ignore.</p>",
                "<p>Do not share this code with others.</p>",
            ]
            .join(""),
        })
        .await
        .map_err(report_mail_err)
}

async fn send_password_reset_email(
    mail_client: &MailClient,
    target_email: &str,
    user_name: &str,
    config: &Config,
    otp_code: &str,
) -> Result<(), AuthError> {
    mail_client
        .mail_new(MailNewProps {
            destination: target_email.to_owned(),
            topic: "password_reset".to_owned(),
            title: format!("{}: Password Reset", config.site_name),
            content: [
                &format!("<p>Hello {},</p>", user_name),
                &format!(
                    "<p>Your password reset code is: <code>{}</code></p>",
                    otp_code
                ),
                &format!(
                    "<p>This code is valid for up to {} minutes.</p>",
                    config.reset_otp_ttl / 60_000
                ),
                "<p>If you did not make this request, then feel free to ignore ",
                "and your password will remain unchanged.</p>",
                "<p>Do not share this code with others.</p>",
            ]
            .join(""),
        })
        .await
        .map_err(report_mail_err)
}

// both tokens of a pair are opaque random strings; only their hashes are stored
fn mint_token_pair(
    con: &Connection,
    config: &Config,
    user_id: i64,
    now: i64,
) -> Result<response::TokenPair, AuthError> {
    let raw_access = utils::gen_random_string();
    token_service::add(
        con,
        user_id,
        utils::hash_str(&raw_access),
        TokenKind::Access,
        config.access_token_duration,
        now,
    )
    .map_err(report_sqlite_err)?;

    let raw_refresh = utils::gen_random_string();
    token_service::add(
        con,
        user_id,
        utils::hash_str(&raw_refresh),
        TokenKind::Refresh,
        config.refresh_token_duration,
        now,
    )
    .map_err(report_sqlite_err)?;

    Ok(response::TokenPair {
        access: raw_access,
        refresh: raw_refresh,
    })
}

// returns the token if it is the expected kind, not revoked, and in bounds
pub fn get_token_if_valid(
    con: &Connection,
    raw_token: &str,
    token_kind: TokenKind,
) -> Result<SessionToken, AuthError> {
    let token = token_service::get_by_token_hash(con, &utils::hash_str(raw_token))
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::TokenNonexistent)?;

    // a cancel row shadowing the hash lands here too
    if token.token_kind != token_kind {
        return Err(AuthError::TokenUnauthorized);
    }

    if utils::current_time_millis() > token.creation_time + token.duration {
        return Err(AuthError::TokenUnauthorized);
    }

    Ok(token)
}

pub async fn register_submit(
    data: &Data,
    props: super::request::RegisterSubmitProps,
) -> Result<response::PendingRegistration, AuthError> {
    // server side validation of password strength
    if !utils::is_secure_password(&props.password) {
        return Err(AuthError::PasswordInsecure);
    }

    let email = utils::normalize_email(&props.email);

    let con = &mut *data.db.lock().await;

    // the address must not belong to a verified account
    if user_service::exists_by_email(con, &email).map_err(report_sqlite_err)? {
        return Err(AuthError::UserExistent);
    }

    let otp_code = utils::gen_otp_code();

    // deliver first: a failed send must leave no staged state behind
    send_verification_email(&data.mail_client, &email, &props.name, &data.config, &otp_code)
        .await?;

    let password_hash = utils::hash_password(&props.password).map_err(report_internal_err)?;
    let now = utils::current_time_millis();

    let tx = con.transaction().map_err(report_sqlite_err)?;

    // at most one live staging record per email; its codes die with it
    pending_registration_service::delete_by_email(&tx, &email).map_err(report_sqlite_err)?;
    otp_service::mark_all_used_by_owner(&tx, OtpKind::Registration, &email)
        .map_err(report_sqlite_err)?;

    let pending =
        pending_registration_service::add(&tx, email, props.name, password_hash, now)
            .map_err(report_sqlite_err)?;

    otp_service::add(
        &tx,
        OtpKind::Registration,
        pending.email.clone(),
        otp_code,
        now,
        now + data.config.registration_otp_ttl,
    )
    .map_err(report_sqlite_err)?;

    tx.commit().map_err(report_sqlite_err)?;

    Ok(fill_pending_registration(pending))
}

pub async fn register_resend(
    data: &Data,
    props: super::request::RegisterResendProps,
) -> Result<response::PendingRegistration, AuthError> {
    let email = utils::normalize_email(&props.email);

    let con = &mut *data.db.lock().await;

    let pending = pending_registration_service::get_by_email(con, &email)
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::PendingRegistrationNonexistent)?;

    let otp_code = utils::gen_otp_code();

    send_verification_email(
        &data.mail_client,
        &pending.email,
        &pending.name,
        &data.config,
        &otp_code,
    )
    .await?;

    let now = utils::current_time_millis();

    let tx = con.transaction().map_err(report_sqlite_err)?;

    // supersede: the previously issued code must never verify again
    otp_service::mark_all_used_by_owner(&tx, OtpKind::Registration, &email)
        .map_err(report_sqlite_err)?;

    otp_service::add(
        &tx,
        OtpKind::Registration,
        email,
        otp_code,
        now,
        now + data.config.registration_otp_ttl,
    )
    .map_err(report_sqlite_err)?;

    tx.commit().map_err(report_sqlite_err)?;

    Ok(fill_pending_registration(pending))
}

pub async fn register_verify(
    data: &Data,
    props: super::request::RegisterVerifyProps,
) -> Result<response::AuthenticatedUser, AuthError> {
    let email = utils::normalize_email(&props.email);
    let now = utils::current_time_millis();

    let con = &mut *data.db.lock().await;

    let tx = con.transaction().map_err(report_sqlite_err)?;

    let pending = pending_registration_service::get_by_email(&tx, &email)
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::PendingRegistrationNonexistent)?;

    match otp_service::verify(&tx, OtpKind::Registration, &email, &props.otp_code, now)
        .map_err(report_sqlite_err)?
    {
        OtpVerification::Consumed(_) => {}
        OtpVerification::Expired => return Err(AuthError::OtpTimedOut),
        OtpVerification::NotFound => return Err(AuthError::OtpNonexistent),
    }

    // another staging for this address may have been verified in the meantime
    if user_service::exists_by_email(&tx, &email).map_err(report_sqlite_err)? {
        return Err(AuthError::UserExistent);
    }

    let user = user_service::add(&tx, pending.name, pending.email, pending.password_hash, now)
        .map_err(report_sqlite_err)?;

    // explicit cascade: the staging record and every code it owned
    pending_registration_service::delete_by_email(&tx, &email).map_err(report_sqlite_err)?;
    otp_service::delete_by_owner(&tx, OtpKind::Registration, &email).map_err(report_sqlite_err)?;

    let tokens = mint_token_pair(&tx, &data.config, user.user_id, now)?;

    tx.commit().map_err(report_sqlite_err)?;

    Ok(response::AuthenticatedUser {
        user: fill_user(user),
        tokens,
    })
}

pub async fn login(
    data: &Data,
    props: super::request::LoginProps,
) -> Result<response::AuthenticatedUser, AuthError> {
    let email = utils::normalize_email(&props.email);

    let con = &mut *data.db.lock().await;

    let user = user_service::get_by_email(con, &email)
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::UserNonexistent)?;

    if !utils::verify_password(&props.password, &user.password_hash)
        .map_err(report_internal_err)?
    {
        return Err(AuthError::PasswordIncorrect);
    }

    if !user.is_active {
        return Err(AuthError::UserInactive);
    }

    let now = utils::current_time_millis();

    let tx = con.transaction().map_err(report_sqlite_err)?;
    let tokens = mint_token_pair(&tx, &data.config, user.user_id, now)?;
    tx.commit().map_err(report_sqlite_err)?;

    Ok(response::AuthenticatedUser {
        user: fill_user(user),
        tokens,
    })
}

pub async fn forgot_password(
    data: &Data,
    props: super::request::ForgotPasswordProps,
) -> Result<(), AuthError> {
    let email = utils::normalize_email(&props.email);

    let con = &mut *data.db.lock().await;

    // the API layer masks this as a uniform success message
    let user = user_service::get_by_email(con, &email)
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::UserNonexistent)?;

    let otp_code = utils::gen_otp_code();

    send_password_reset_email(&data.mail_client, &user.email, &user.name, &data.config, &otp_code)
        .await?;

    let now = utils::current_time_millis();

    let tx = con.transaction().map_err(report_sqlite_err)?;

    otp_service::mark_all_used_by_owner(&tx, OtpKind::Reset, &email).map_err(report_sqlite_err)?;

    otp_service::add(
        &tx,
        OtpKind::Reset,
        email,
        otp_code,
        now,
        now + data.config.reset_otp_ttl,
    )
    .map_err(report_sqlite_err)?;

    tx.commit().map_err(report_sqlite_err)?;

    Ok(())
}

/// Client-side confirmation of a reset code without consuming it. This is
/// never authorization: `reset_password` re-validates and consumes.
pub async fn reset_otp_verify(
    data: &Data,
    props: super::request::ResetOtpVerifyProps,
) -> Result<(), AuthError> {
    let email = utils::normalize_email(&props.email);
    let now = utils::current_time_millis();

    let con = &mut *data.db.lock().await;

    if !user_service::exists_by_email(con, &email).map_err(report_sqlite_err)? {
        return Err(AuthError::UserNonexistent);
    }

    let otp = otp_service::get_unused_by_owner_and_code(con, OtpKind::Reset, &email, &props.otp_code)
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::OtpNonexistent)?;

    if now >= otp.expires_at {
        return Err(AuthError::OtpTimedOut);
    }

    Ok(())
}

pub async fn reset_password(
    data: &Data,
    props: super::request::ResetPasswordProps,
) -> Result<(), AuthError> {
    // reject insecure passwords
    if !utils::is_secure_password(&props.new_password) {
        return Err(AuthError::PasswordInsecure);
    }

    let email = utils::normalize_email(&props.email);
    let now = utils::current_time_millis();

    let con = &mut *data.db.lock().await;

    let tx = con.transaction().map_err(report_sqlite_err)?;

    let user = user_service::get_by_email(&tx, &email)
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::UserNonexistent)?;

    match otp_service::verify(&tx, OtpKind::Reset, &email, &props.otp_code, now)
        .map_err(report_sqlite_err)?
    {
        OtpVerification::Consumed(_) => {}
        OtpVerification::Expired => return Err(AuthError::OtpTimedOut),
        OtpVerification::NotFound => return Err(AuthError::OtpNonexistent),
    }

    let new_password_hash =
        utils::hash_password(&props.new_password).map_err(report_internal_err)?;

    user_service::update_password_hash(&tx, user.user_id, &new_password_hash)
        .map_err(report_sqlite_err)?;

    tx.commit().map_err(report_sqlite_err)?;

    Ok(())
}

pub async fn logout(data: &Data, props: super::request::LogoutProps) -> Result<(), AuthError> {
    let con = &mut *data.db.lock().await;

    let token = get_token_if_valid(con, &props.refresh_token, TokenKind::Refresh)?;

    let now = utils::current_time_millis();

    let tx = con.transaction().map_err(report_sqlite_err)?;

    // blacklist: the cancel row shadows the refresh token from now on
    token_service::add(
        &tx,
        token.creator_user_id,
        token.token_hash,
        TokenKind::Cancel,
        0,
        now,
    )
    .map_err(report_sqlite_err)?;

    tx.commit().map_err(report_sqlite_err)?;

    Ok(())
}

pub async fn token_refresh(
    data: &Data,
    props: super::request::TokenRefreshProps,
) -> Result<response::SessionToken, AuthError> {
    let con = &mut *data.db.lock().await;

    let token = get_token_if_valid(con, &props.refresh_token, TokenKind::Refresh)?;

    let now = utils::current_time_millis();
    let raw_access = utils::gen_random_string();

    let tx = con.transaction().map_err(report_sqlite_err)?;

    token_service::add(
        &tx,
        token.creator_user_id,
        utils::hash_str(&raw_access),
        TokenKind::Access,
        data.config.access_token_duration,
        now,
    )
    .map_err(report_sqlite_err)?;

    tx.commit().map_err(report_sqlite_err)?;

    Ok(response::SessionToken {
        token: raw_access,
        duration: data.config.access_token_duration,
    })
}

pub async fn user_me(
    data: &Data,
    props: super::request::UserMeProps,
) -> Result<response::User, AuthError> {
    let con = &mut *data.db.lock().await;

    let token = get_token_if_valid(con, &props.access_token, TokenKind::Access)?;

    let user = user_service::get_by_user_id(con, token.creator_user_id)
        .map_err(report_sqlite_err)?
        .ok_or(AuthError::UserNonexistent)?;

    Ok(fill_user(user))
}
