use std::net::IpAddr;

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub min_password_length: usize,
    /// Tokens never expire unless this is set.
    pub token_ttl: Option<Duration>,
    pub reset_request_limit: u32,
    pub reset_request_window_secs: u64,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("PWRESET_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PWRESET_HOST: {e}"))?;

        let port: u16 = env_or("PWRESET_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PWRESET_PORT: {e}"))?;

        let base_url = env_or("PWRESET_BASE_URL", &format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let min_password_length: usize = env_or("PWRESET_MIN_PASSWORD_LENGTH", "6")
            .parse()
            .map_err(|e| format!("Invalid PWRESET_MIN_PASSWORD_LENGTH: {e}"))?;

        let token_ttl = parse_token_ttl(std::env::var("PWRESET_TOKEN_TTL_MINUTES").ok().as_deref())?;

        let reset_request_limit: u32 = env_or("PWRESET_RESET_REQUEST_LIMIT", "5")
            .parse()
            .map_err(|e| format!("Invalid PWRESET_RESET_REQUEST_LIMIT: {e}"))?;

        let reset_request_window_secs: u64 = env_or("PWRESET_RESET_REQUEST_WINDOW_SECS", "900")
            .parse()
            .map_err(|e| format!("Invalid PWRESET_RESET_REQUEST_WINDOW_SECS: {e}"))?;

        let log_level = env_or("PWRESET_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("PWRESET_SMTP_HOST").ok(),
            std::env::var("PWRESET_SMTP_PORT").ok(),
            std::env::var("PWRESET_SMTP_USER").ok(),
            std::env::var("PWRESET_SMTP_PASS").ok(),
            std::env::var("PWRESET_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid PWRESET_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            host,
            port,
            base_url,
            min_password_length,
            token_ttl,
            reset_request_limit,
            reset_request_window_secs,
            log_level,
            smtp,
        })
    }
}

/// Unset or blank means tokens never expire.
fn parse_token_ttl(raw: Option<&str>) -> Result<Option<Duration>, String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let minutes: i64 = raw
        .parse()
        .map_err(|e| format!("Invalid PWRESET_TOKEN_TTL_MINUTES: {e}"))?;
    if minutes <= 0 {
        return Err("Invalid PWRESET_TOKEN_TTL_MINUTES: must be positive".to_string());
    }
    Duration::try_minutes(minutes)
        .map(Some)
        .ok_or_else(|| "Invalid PWRESET_TOKEN_TTL_MINUTES: out of range".to_string())
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_unset_or_blank_means_no_expiry() {
        assert_eq!(parse_token_ttl(None), Ok(None));
        assert_eq!(parse_token_ttl(Some("  ")), Ok(None));
    }

    #[test]
    fn ttl_parses_minutes() {
        assert_eq!(parse_token_ttl(Some(" 60 ")), Ok(Some(Duration::minutes(60))));
    }

    #[test]
    fn ttl_rejects_zero_and_negative() {
        assert!(parse_token_ttl(Some("0")).unwrap_err().contains("must be positive"));
        assert!(parse_token_ttl(Some("-5")).unwrap_err().contains("must be positive"));
    }

    #[test]
    fn ttl_rejects_out_of_range_and_garbage() {
        let err = parse_token_ttl(Some("9223372036854775807")).unwrap_err();
        assert!(err.contains("out of range"));
        assert!(parse_token_ttl(Some("soon")).is_err());
    }
}
