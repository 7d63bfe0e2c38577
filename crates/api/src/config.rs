use leasehold_core::payment::DEFAULT_CURRENCY;
use leasehold_providers::{geocoder, paystack};

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Identity-provider settings.
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    /// PEM-encoded RS256 public key for session tokens. When unset every
    /// authenticated route answers 401.
    pub jwt_public_key: Option<String>,
    /// `whsec_…` secret for lifecycle webhooks. When unset the webhook answers 500.
    pub webhook_secret: Option<String>,
}

/// Payment-gateway settings.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub secret_key: Option<String>,
    pub base_url: String,
    pub currency: String,
    /// Frontend origin; checkout redirects to `{client_url}/payment/verify`.
    pub client_url: String,
}

impl PaymentConfig {
    pub fn callback_url(&self) -> String {
        format!("{}/payment/verify", self.client_url.trim_end_matches('/'))
    }
}

/// Geocoding service settings.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
    pub identity: IdentityConfig,
    pub payments: PaymentConfig,
    pub geocoder: GeocoderConfig,
}

/// Read an env var, treating empty values as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                               |
    /// |------------------------|---------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                             |
    /// | `PORT`                 | `3000`                                |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`               |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                  |
    /// | `LOG_FORMAT`           | `text`                                |
    /// | `CLIENT_URL`           | `http://localhost:3000`               |
    /// | `CLERK_JWT_PUBLIC_KEY` | unset                                 |
    /// | `CLERK_WEBHOOK_SECRET` | unset                                 |
    /// | `PAYSTACK_SECRET_KEY`  | unset                                 |
    /// | `PAYSTACK_BASE_URL`    | `https://api.paystack.co`             |
    /// | `PAYMENT_CURRENCY`     | `GHS`                                 |
    /// | `GEOCODER_BASE_URL`    | `https://nominatim.openstreetmap.org` |
    /// | `GEOCODER_USER_AGENT`  | `Leasehold/0.1`                       |
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or an unknown `LOG_FORMAT`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let log_format = match optional_env("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => panic!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
        };

        // PEM keys are often stored on one line with literal `\n` escapes.
        let identity = IdentityConfig {
            jwt_public_key: optional_env("CLERK_JWT_PUBLIC_KEY").map(|k| k.replace("\\n", "\n")),
            webhook_secret: optional_env("CLERK_WEBHOOK_SECRET"),
        };

        let payments = PaymentConfig {
            secret_key: optional_env("PAYSTACK_SECRET_KEY"),
            base_url: optional_env("PAYSTACK_BASE_URL")
                .unwrap_or_else(|| paystack::DEFAULT_BASE_URL.into()),
            currency: optional_env("PAYMENT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.into()),
            client_url: optional_env("CLIENT_URL")
                .unwrap_or_else(|| "http://localhost:3000".into()),
        };

        let geocoder = GeocoderConfig {
            base_url: optional_env("GEOCODER_BASE_URL")
                .unwrap_or_else(|| geocoder::DEFAULT_BASE_URL.into()),
            user_agent: optional_env("GEOCODER_USER_AGENT")
                .unwrap_or_else(|| geocoder::DEFAULT_USER_AGENT.into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            log_format,
            identity,
            payments,
            geocoder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_url_strips_trailing_slash() {
        let payments = PaymentConfig {
            secret_key: None,
            base_url: String::new(),
            currency: "GHS".into(),
            client_url: "https://app.example.com/".into(),
        };
        assert_eq!(payments.callback_url(), "https://app.example.com/payment/verify");
    }
}
