//! Configuration module for the chata backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which backend persists the CMS content document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentBackend {
    /// Flat JSON file with rolling backups
    File,
    /// SQLite key-value table
    Sqlite,
}

impl FromStr for ContentBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(ContentBackend::File),
            "sqlite" | "db" => Ok(ContentBackend::Sqlite),
            other => Err(format!("Unknown content backend: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin password for the content panel (admin writes are rejected when unset)
    pub admin_password: Option<String>,
    /// Lifetime of an issued admin session token
    pub session_ttl: Duration,
    /// External calendar feed URLs
    pub ics_urls: Vec<String>,
    /// How long merged availability is served from memory
    pub availability_ttl: Duration,
    /// Per-request timeout for calendar feeds and the mail relay
    pub fetch_timeout: Duration,
    /// Content persistence backend
    pub content_backend: ContentBackend,
    /// Path to the content JSON file
    pub content_path: PathBuf,
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// Directory for uploaded images
    pub upload_dir: PathBuf,
    /// Upload size ceiling in bytes
    pub max_upload_bytes: usize,
    /// Maximum number of guests per booking
    pub max_guests: u32,
    /// Nightly rate overrides
    pub rate_off_season: Option<u32>,
    pub rate_season: Option<u32>,
    pub rate_top_season: Option<u32>,
    /// Mail relay endpoint; notifications are only logged when unset
    pub mail_relay_url: Option<String>,
    pub mail_relay_key: Option<String>,
    pub mail_from: String,
    pub owner_email: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_password = non_empty_var("CHATA_ADMIN_PASSWORD");

        let ics_urls = env::var("CHATA_ICS_URLS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let content_backend = env::var("CHATA_CONTENT_BACKEND")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(ContentBackend::File);

        let bind_addr = env::var("CHATA_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid CHATA_BIND_ADDR format");

        Self {
            admin_password,
            session_ttl: Duration::from_secs(parsed_var("CHATA_SESSION_TTL_HOURS", 12u64) * 3600),
            ics_urls,
            availability_ttl: Duration::from_secs(parsed_var("CHATA_AVAILABILITY_TTL_SECS", 1200)),
            fetch_timeout: Duration::from_secs(parsed_var("CHATA_FETCH_TIMEOUT_SECS", 10)),
            content_backend,
            content_path: env::var("CHATA_CONTENT_PATH")
                .unwrap_or_else(|_| "./data/content.json".to_string())
                .into(),
            db_path: env::var("CHATA_DB_PATH")
                .unwrap_or_else(|_| "./data/content.sqlite".to_string())
                .into(),
            upload_dir: env::var("CHATA_UPLOAD_DIR")
                .unwrap_or_else(|_| "./data/uploads".to_string())
                .into(),
            max_upload_bytes: parsed_var("CHATA_MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            max_guests: parsed_var("CHATA_MAX_GUESTS", 8),
            rate_off_season: optional_parsed_var("CHATA_RATE_OFF_SEASON"),
            rate_season: optional_parsed_var("CHATA_RATE_SEASON"),
            rate_top_season: optional_parsed_var("CHATA_RATE_TOP_SEASON"),
            mail_relay_url: non_empty_var("CHATA_MAIL_RELAY_URL"),
            mail_relay_key: non_empty_var("CHATA_MAIL_RELAY_KEY"),
            mail_from: env::var("CHATA_MAIL_FROM")
                .unwrap_or_else(|_| "rezervace@chata.local".to_string()),
            owner_email: env::var("CHATA_OWNER_EMAIL")
                .unwrap_or_else(|_| "owner@chata.local".to_string()),
            bind_addr,
            log_level: env::var("CHATA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("CHATA_LOG_FORMAT")
                .map(|f| f.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn optional_parsed_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = non_empty_var(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    optional_parsed_var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for key in [
            "CHATA_ADMIN_PASSWORD",
            "CHATA_ICS_URLS",
            "CHATA_CONTENT_BACKEND",
            "CHATA_CONTENT_PATH",
            "CHATA_BIND_ADDR",
            "CHATA_LOG_LEVEL",
            "CHATA_LOG_FORMAT",
            "CHATA_AVAILABILITY_TTL_SECS",
            "CHATA_RATE_TOP_SEASON",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env();

        assert!(config.admin_password.is_none());
        assert!(config.ics_urls.is_empty());
        assert_eq!(config.content_backend, ContentBackend::File);
        assert_eq!(config.content_path, PathBuf::from("./data/content.json"));
        assert_eq!(config.availability_ttl, Duration::from_secs(20 * 60));
        assert_eq!(config.rate_top_season, None);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
    }

    #[test]
    fn test_content_backend_names() {
        assert_eq!("file".parse(), Ok(ContentBackend::File));
        assert_eq!(" SQLite ".parse(), Ok(ContentBackend::Sqlite));
        assert!("redis".parse::<ContentBackend>().is_err());
    }
}
