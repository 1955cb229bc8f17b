use anyhow::{Context, Result, anyhow};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_DATABASE: &str = "qr_studio";
const DEFAULT_SHORT_CODE_ATTEMPTS: u32 = 3;
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:4173"];

/// Deployment settings, read once at startup and passed around explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    /// Public origin printed into dynamic QR codes, without trailing slash.
    /// Changing it in production breaks every dynamic code already printed.
    pub base_url: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub short_code_attempts: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{} not set", key))
        };

        let port = required("PORT")?
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let base_url = required("APP_BASE_URL")?.trim_end_matches('/').to_string();

        let cors_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let short_code_attempts = match lookup("SHORT_CODE_ATTEMPTS") {
            Some(raw) => raw
                .parse::<u32>()
                .context("SHORT_CODE_ATTEMPTS must be a positive integer")?
                .max(1),
            None => DEFAULT_SHORT_CODE_ATTEMPTS,
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            mongodb_uri: required("MONGODB_URI")?,
            database_name: lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            base_url,
            jwt_secret: required("JWT_SECRET")?,
            cors_origins,
            short_code_attempts,
        })
    }
}
