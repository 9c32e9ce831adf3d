use crate::shared::error::AppError;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_SESSION_FILE: &str = ".sucursal-admin/session.json";

/// Runtime settings for the client, read from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
    pub notification_ttl: Duration,
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: Duration::from_secs(30),
            notification_ttl: Duration::from_millis(4000),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("SUCURSAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let session_file = env::var("SUCURSAL_SESSION_FILE")
            .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string());

        let timeout_secs = env::var("SUCURSAL_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let notification_ms = env::var("SUCURSAL_NOTIFICATION_MS")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .unwrap_or(4000);

        Ok(Self {
            api_url: parse_api_url(&api_url)?,
            session_file: PathBuf::from(session_file),
            request_timeout: Duration::from_secs(timeout_secs),
            notification_ttl: Duration::from_millis(notification_ms),
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, AppError> {
    let mut url =
        Url::parse(raw).map_err(|e| AppError::Config(format!("invalid API URL {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {
            ensure_trailing_slash(&mut url);
            Ok(url)
        }
        other => Err(AppError::Config(format!(
            "unsupported API URL scheme {other:?}"
        ))),
    }
}

/// A trailing slash makes `Url::join` append to the path instead of
/// replacing its last segment.
pub(crate) fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
}
