use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, Serialize)]
pub struct MailNewProps {
    pub destination: String,
    pub topic: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug)]
pub enum MailError {
    // the mail service refused the message
    Rejected(u16),
    Transport(reqwest::Error),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::Rejected(status) => write!(f, "mail service rejected message: {}", status),
            MailError::Transport(e) => write!(f, "mail service unreachable: {}", e),
        }
    }
}

impl std::error::Error for MailError {}

#[derive(Clone)]
enum Backend {
    Http { client: reqwest::Client, url: String },
    // development backend: log the mail instead of delivering it
    Console,
}

#[derive(Clone)]
pub struct MailClient {
    backend: Backend,
}

impl MailClient {
    pub fn new(mail_service_url: &str) -> Self {
        MailClient {
            backend: Backend::Http {
                client: reqwest::Client::new(),
                url: String::from(mail_service_url),
            },
        }
    }

    pub fn console() -> Self {
        MailClient {
            backend: Backend::Console,
        }
    }

    pub async fn mail_new(&self, props: MailNewProps) -> Result<(), MailError> {
        match &self.backend {
            Backend::Http { client, url } => {
                let resp = client
                    .post(format!("{}/mail/new", url))
                    .json(&serde_json::json!({
                        "destination": props.destination,
                        "topic": props.topic,
                        "title": props.title,
                        "content": props.content,
                    }))
                    .send()
                    .await
                    .map_err(MailError::Transport)?;

                if !resp.status().is_success() {
                    return Err(MailError::Rejected(resp.status().as_u16()));
                }

                Ok(())
            }
            Backend::Console => {
                log::info!(
                    "mail[{}] to={} title={:?} content={:?}",
                    props.topic,
                    props.destination,
                    props.title,
                    props.content
                );
                Ok(())
            }
        }
    }
}
