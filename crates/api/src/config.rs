use std::str::FromStr;

use souq_events::MeasurementConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks to drain on shutdown.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// `None` disables analytics forwarding.
    pub analytics: Option<MeasurementConfig>,
}

/// Measurement Protocol collect endpoint used when only the id and secret
/// are configured.
pub const DEFAULT_ANALYTICS_ENDPOINT: &str = "https://www.google-analytics.com/mp/collect";

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                    |
    /// | `ANALYTICS_ENDPOINT`       | GA4 collect URL         |
    /// | `ANALYTICS_MEASUREMENT_ID` | unset (disabled)        |
    /// | `ANALYTICS_API_SECRET`     | unset (disabled)        |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_parse("PORT", 3000u16);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", 30u64);
        let shutdown_timeout_secs = env_parse("SHUTDOWN_TIMEOUT_SECS", 30u64);

        let analytics = analytics_config(
            std::env::var("ANALYTICS_ENDPOINT").ok(),
            std::env::var("ANALYTICS_MEASUREMENT_ID").ok(),
            std::env::var("ANALYTICS_API_SECRET").ok(),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            analytics,
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} is invalid ({raw:?}): {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Analytics is on only when both the measurement id and the API secret
/// are present and non-blank.
fn analytics_config(
    endpoint: Option<String>,
    measurement_id: Option<String>,
    api_secret: Option<String>,
) -> Option<MeasurementConfig> {
    let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    Some(MeasurementConfig {
        endpoint: non_blank(endpoint).unwrap_or_else(|| DEFAULT_ANALYTICS_ENDPOINT.to_string()),
        measurement_id: non_blank(measurement_id)?,
        api_secret: non_blank(api_secret)?,
    })
}
