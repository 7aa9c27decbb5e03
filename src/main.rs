use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use rusqlite::Connection;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::Mutex;

mod utils;

mod db_init;
mod db_types;
mod request;
mod response;

mod api;
mod handlers;
mod mail_client;
mod validations;

// database interface
mod otp_service;
mod pending_registration_service;
mod token_service;
mod user_service;

static SERVICE_NAME: &str = "account-service";
static VERSION_MAJOR: i64 = 0;
static VERSION_MINOR: i64 = 1;
static VERSION_REV: i64 = 0;

#[derive(Parser, Clone)]
#[clap(about, version, author)]
struct Opts {
    #[clap(long)]
    port: u16,
    #[clap(long)]
    database_path: String,
    /// base url of the mail delivery service; omit to log mail to the console
    #[clap(long)]
    mail_service_url: Option<String>,
    #[clap(long)]
    site_name: String,
    #[clap(long, default_value_t = 5)]
    registration_otp_ttl_minutes: i64,
    #[clap(long, default_value_t = 5)]
    reset_otp_ttl_minutes: i64,
    #[clap(long, default_value_t = 15)]
    access_token_duration_minutes: i64,
    #[clap(long, default_value_t = 7)]
    refresh_token_duration_days: i64,
}

// built once at startup and passed along explicitly, never ambient state
#[derive(Clone)]
pub struct Config {
    pub site_name: String,
    pub registration_otp_ttl: i64,
    pub reset_otp_ttl: i64,
    pub access_token_duration: i64,
    pub refresh_token_duration: i64,
}

#[derive(Clone)]
pub struct Data {
    pub db: Arc<Mutex<Connection>>,
    pub mail_client: mail_client::MailClient,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    env_logger::init();

    let Opts {
        port,
        database_path,
        mail_service_url,
        site_name,
        registration_otp_ttl_minutes,
        reset_otp_ttl_minutes,
        access_token_duration_minutes,
        refresh_token_duration_days,
    } = Opts::parse();

    let mut con = Connection::open(&database_path)?;
    db_init::initialize(&mut con)?;

    let mail_client = match mail_service_url {
        Some(url) => mail_client::MailClient::new(&url),
        None => {
            log::warn!("no mail service configured, logging mail to console");
            mail_client::MailClient::console()
        }
    };

    let data = Data {
        db: Arc::new(Mutex::new(con)),
        mail_client,
        config: Config {
            site_name,
            registration_otp_ttl: registration_otp_ttl_minutes * 60 * 1000,
            reset_otp_ttl: reset_otp_ttl_minutes * 60 * 1000,
            access_token_duration: access_token_duration_minutes * 60 * 1000,
            refresh_token_duration: refresh_token_duration_days * 24 * 60 * 60 * 1000,
        },
    };

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(data.clone()))
            .service(web::resource("/public/info").route(web::route().to(api::info)))
            .service(
                web::resource("/public/register/submit")
                    .route(web::route().to(api::register_submit)),
            )
            .service(
                web::resource("/public/register/verify")
                    .route(web::route().to(api::register_verify)),
            )
            .service(
                web::resource("/public/register/resend")
                    .route(web::route().to(api::register_resend)),
            )
            .service(web::resource("/public/login").route(web::route().to(api::login)))
            .service(
                web::resource("/public/forgot_password")
                    .route(web::route().to(api::forgot_password)),
            )
            .service(
                web::resource("/public/reset_password/verify")
                    .route(web::route().to(api::reset_otp_verify)),
            )
            .service(
                web::resource("/public/reset_password")
                    .route(web::route().to(api::reset_password)),
            )
            .service(
                web::resource("/public/reset_password/resend")
                    .route(web::route().to(api::forgot_password)),
            )
            .service(web::resource("/public/logout").route(web::route().to(api::logout)))
            .service(
                web::resource("/public/token/refresh").route(web::route().to(api::token_refresh)),
            )
            .service(web::resource("/public/user/me").route(web::route().to(api::user_me)))
    })
    .bind((Ipv4Addr::LOCALHOST, port))?
    .run()
    .await?;

    Ok(())
}
