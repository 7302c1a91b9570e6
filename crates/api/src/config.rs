use agendizo_billing::StripeConfig;
use agendizo_events::EmailConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Public base URL of the web app, used for checkout redirects.
    pub site_url: String,
    /// Adds `Secure` to the session cookie.
    pub session_cookie_secure: bool,
    pub jwt: JwtConfig,
    /// SMTP settings for in-process email delivery.
    pub email: Option<EmailConfig>,
    /// Remote `send-email` function; preferred over SMTP when set.
    pub email_functions: Option<EmailFunctionsConfig>,
    pub stripe: Option<StripeConfig>,
}

/// Where the remote email functions live.
#[derive(Debug, Clone)]
pub struct EmailFunctionsConfig {
    pub url: String,
    pub api_key: Option<String>,
}

impl EmailFunctionsConfig {
    /// Returns `None` when `EMAIL_FUNCTIONS_URL` is unset.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("EMAIL_FUNCTIONS_URL")
            .ok()
            .filter(|s| !s.is_empty())?;
        Some(Self {
            url,
            api_key: std::env::var("EMAIL_FUNCTIONS_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SITE_URL`              | `http://localhost:5173` |
    /// | `SESSION_COOKIE_SECURE` | `false`                 |
    ///
    /// Session, SMTP, email-function and Stripe settings are read by their
    /// own `from_env` constructors.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let session_cookie_secure = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            site_url,
            session_cookie_secure,
            jwt: JwtConfig::from_env(),
            email: EmailConfig::from_env(),
            email_functions: EmailFunctionsConfig::from_env(),
            stripe: StripeConfig::from_env(),
        }
    }
}
