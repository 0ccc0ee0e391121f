/*
 * Responsibility
 * - Load configuration from the environment (DATABASE_URL, CORS allow-list,
 *   auth verification settings, media-store credentials)
 * - Validate at startup (missing required values fail the boot)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_leeway_seconds: u64,
    pub access_jwt_public_key_pem: String,

    pub media_upload_url: Url,
    pub media_account: String,
    pub media_key: String,
    pub media_secret: String,
    pub media_folder: String,
    pub media_allowed_formats: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        // Exact scheme+host+port strings. An empty list allows no origin.
        let cors_allowed_origins = split_csv(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        );

        let sqids_min_length = std::env::var("SQIDS_MIN_LENGTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10);

        let sqids_alphabet = std::env::var("SQIDS_ALPHABET").unwrap_or_else(|_| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let auth_issuer =
            std::env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience =
            std::env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let access_jwt_public_key_pem = std::env::var("ACCESS_JWT_PUBLIC_KEY_PEM")
            .map_err(|_| ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let media_upload_url = std::env::var("MEDIA_UPLOAD_URL")
            .map_err(|_| ConfigError::Missing("MEDIA_UPLOAD_URL"))?;
        let media_upload_url =
            Url::parse(&media_upload_url).map_err(|_| ConfigError::Invalid("MEDIA_UPLOAD_URL"))?;

        let media_account =
            std::env::var("MEDIA_ACCOUNT").map_err(|_| ConfigError::Missing("MEDIA_ACCOUNT"))?;
        let media_key =
            std::env::var("MEDIA_KEY").map_err(|_| ConfigError::Missing("MEDIA_KEY"))?;
        let media_secret =
            std::env::var("MEDIA_SECRET").map_err(|_| ConfigError::Missing("MEDIA_SECRET"))?;

        let media_folder =
            std::env::var("MEDIA_FOLDER").unwrap_or_else(|_| "uploads".to_string());

        let media_allowed_formats = {
            let raw = std::env::var("MEDIA_ALLOWED_FORMATS")
                .unwrap_or_else(|_| "jpeg,png,jpg,gif".to_string());
            split_csv(&raw)
        };

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            sqids_min_length,
            sqids_alphabet,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            access_jwt_public_key_pem,
            media_upload_url,
            media_account,
            media_key,
            media_secret,
            media_folder,
            media_allowed_formats,
        })
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_csv;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        let origins = split_csv(" http://localhost:3000 ,, http://localhost:5000,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5000".to_string()
            ]
        );
    }

    #[test]
    fn split_csv_of_empty_input_is_empty() {
        assert!(split_csv("").is_empty());
    }
}
