use std::env;
use std::time::Duration;

use chrono::Locale;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub library_api_url: String,
    pub library_api_token: Option<String>,
    pub library_api_timeout_secs: u64,
    pub reference_stale_secs: u64,
    pub request_stale_secs: u64,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub locale: Locale,
}

/// Staleness windows applied by the dashboard query cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Staleness {
    /// Users, books and categories.
    pub reference: Duration,
    /// Borrow and donation requests.
    pub requests: Duration,
}

impl Default for Staleness {
    fn default() -> Self {
        Self {
            reference: Duration::from_secs(5 * 60),
            requests: Duration::from_secs(2 * 60),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            library_api_url: env::var("LIBRARY_API_URL")?,
            library_api_token: env::var("LIBRARY_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            library_api_timeout_secs: env::var("LIBRARY_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            reference_stale_secs: env::var("REFERENCE_STALE_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
            request_stale_secs: env::var("REQUEST_STALE_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap_or(120),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            jwt_secret: env::var("JWT_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "https://localhost:5173".to_string()),
            locale: env::var("DASHBOARD_LOCALE")
                .ok()
                .and_then(|name| Locale::try_from(name.as_str()).ok())
                .unwrap_or(Locale::en_US),
        })
    }

    pub fn staleness(&self) -> Staleness {
        Staleness {
            reference: Duration::from_secs(self.reference_stale_secs),
            requests: Duration::from_secs(self.request_stale_secs),
        }
    }

    pub fn library_api_timeout(&self) -> Duration {
        Duration::from_secs(self.library_api_timeout_secs)
    }
}
