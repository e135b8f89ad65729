use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
/// One year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Token lifetime from `JWT_TTL_MINUTES`, kept within `1..=MAX_TOKEN_TTL_MINUTES`.
/// Unset or unparsable values fall back to the default.
fn token_ttl_minutes(raw: Option<String>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES)
        .clamp(1, MAX_TOKEN_TTL_MINUTES)
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .or_else(|_| std::env::var("SECRET"))
                .context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ecopoint".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "ecopoint-clients".into()),
            ttl_minutes: token_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok()),
        };
        let geocoder = GeocoderConfig {
            endpoint: std::env::var("GEO_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_ENDPOINT.into()),
            api_key: std::env::var("GEO_API_KEY").context("GEO_API_KEY must be set")?,
            timeout_secs: std::env::var("GEO_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            geocoder,
        })
    }
}
