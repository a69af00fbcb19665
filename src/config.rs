use std::time::Duration;

use thiserror::Error;

pub const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub check_endpoint: String,
    pub heartbeat_s: u64,
    pub sendgrid_key: String,
    pub to_email: String,
    pub from_email: String,
    pub http_timeout_s: u64,
    pub sendgrid_api_url: String,
}

fn default_heartbeat_s() -> u64 { 300 }
fn default_http_timeout_s() -> u64 { 10 }

impl MonitorConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values count as missing. Every required key is checked before
    /// the monitor starts so a misconfigured process never enters the loop.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let seconds = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                None => Ok(default),
                Some(raw) => match raw.parse::<u64>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ConfigError::Invalid {
                        key,
                        value: raw,
                        expected: "a positive number of seconds",
                    }),
                },
            }
        };

        Ok(Self {
            check_endpoint: required("CHECK_ENDPOINT")?,
            heartbeat_s: seconds("HEARTBEAT_S", default_heartbeat_s())?,
            sendgrid_key: required("SENDGRID_KEY")?,
            to_email: required("TO_EMAIL")?,
            from_email: required("FROM_EMAIL")?,
            http_timeout_s: seconds("HTTP_TIMEOUT_S", default_http_timeout_s())?,
            sendgrid_api_url: get("SENDGRID_API_URL")
                .unwrap_or_else(|| SENDGRID_SEND_URL.to_string()),
        })
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_s)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_s)
    }

    #[cfg(test)]
    pub(crate) fn sample(check_endpoint: &str, sendgrid_api_url: &str) -> Self {
        Self {
            check_endpoint: check_endpoint.to_string(),
            heartbeat_s: 1,
            sendgrid_key: "SG.test-key".to_string(),
            to_email: "ops@example.com".to_string(),
            from_email: "monitor@example.com".to_string(),
            http_timeout_s: 2,
            sendgrid_api_url: sendgrid_api_url.to_string(),
        }
    }
}
