//! Service configuration, loaded once at startup from the environment.
//!
//! The resulting [`Config`] is passed explicitly into the components that
//! need it; nothing below the HTTP layer reads environment variables.
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `BIND_ADDR` | No | Listen address (default `0.0.0.0:8080`) |
//! | `DATABASE_URL` | Yes | PostgreSQL connection URL |
//! | `EMAIL_CIPHER_KEY` | Yes | 32-byte (or 64 hex char) address decryption key |
//! | `MAIL_BACKEND` | No | `smtp`, `local`, or `logger` (default `smtp`) |
//! | `SMTP_HOST` | No | SMTP server host (default `localhost`) |
//! | `SMTP_PORT` | No | SMTP server port (default `465`) |
//! | `SMTP_USERNAME` | No | SMTP username (empty disables auth) |
//! | `SMTP_PASSWORD` | No | SMTP password |
//! | `SMTP_TLS` | No | `tls`, `starttls`, or `none` (default `tls`) |
//! | `FROM_EMAIL` | Yes | Sender address |
//! | `FROM_NAME` | No | Sender display name (default `iReserve System`) |

use std::env;
use std::str::FromStr;

use crate::address::Address;
use crate::error::ConfigError;
use crate::providers::TlsMode;

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address for the HTTP server.
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Key string for the address cipher (validated at startup).
    pub cipher_key: String,
    /// Outbound mail settings.
    pub mail: MailConfig,
}

/// Outbound mail settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub tls: TlsMode,
    pub from_email: String,
    pub from_name: String,
}

/// Which mail transport to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    /// Real SMTP delivery via lettre.
    Smtp,
    /// In-memory capture (development).
    Local,
    /// Log-only, nothing is sent.
    Logger,
}

impl FromStr for MailBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "local" => Ok(Self::Local),
            "logger" => Ok(Self::Logger),
            other => Err(ConfigError(format!(
                "unknown MAIL_BACKEND: {}. Valid backends are: smtp, local, logger",
                other
            ))),
        }
    }
}

impl Config {
    /// Load the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: required("DATABASE_URL")?,
            cipher_key: required("EMAIL_CIPHER_KEY")?,
            mail: MailConfig::from_env()?,
        })
    }
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env::var("MAIL_BACKEND")
            .unwrap_or_else(|_| "smtp".to_string())
            .parse()?;
        let tls = match env::var("SMTP_TLS")
            .unwrap_or_else(|_| "tls".to_string())
            .to_lowercase()
            .as_str()
        {
            "tls" => TlsMode::Tls,
            "starttls" => TlsMode::StartTls,
            "none" => TlsMode::None,
            other => {
                return Err(ConfigError(format!(
                    "unknown SMTP_TLS: {}. Valid modes are: tls, starttls, none",
                    other
                )))
            }
        };

        Ok(Self {
            backend,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "465".to_string())
                .parse()
                .map_err(|_| ConfigError("SMTP_PORT must be a valid port number".into()))?,
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            tls,
            from_email: required("FROM_EMAIL")?,
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "iReserve System".to_string()),
        })
    }

    /// The configured sender as an [`Address`].
    pub fn from_address(&self) -> Address {
        Address::with_name(&self.from_name, &self.from_email)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError(format!("{} not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("smtp".parse::<MailBackend>().unwrap(), MailBackend::Smtp);
        assert_eq!("LOCAL".parse::<MailBackend>().unwrap(), MailBackend::Local);
        assert_eq!("logger".parse::<MailBackend>().unwrap(), MailBackend::Logger);
        assert!("sendmail".parse::<MailBackend>().is_err());
    }

    #[test]
    fn test_from_address_carries_name() {
        let mail = MailConfig {
            backend: MailBackend::Local,
            smtp_host: "localhost".into(),
            smtp_port: 465,
            smtp_username: String::new(),
            smtp_password: String::new(),
            tls: TlsMode::Tls,
            from_email: "noreply@example.com".into(),
            from_name: "iReserve System".into(),
        };
        let addr = mail.from_address();
        assert_eq!(addr.formatted(), "iReserve System <noreply@example.com>");
    }
}
