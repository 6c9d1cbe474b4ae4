use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::errors::ConfigError;

// ============================================================================
// Service Settings - process-wide, read once from the environment
// ============================================================================

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DEPLOY_ID: &str = "1";
const DEFAULT_LOG_FILTER: &str = "info,netsuite_sync=debug";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub host: String,
    pub port: u16,
    pub restlet: RestletSettings,
    pub logging: LoggingSettings,
}

/// Which RESTlet deployment the ledger client talks to.
#[derive(Debug, Clone, PartialEq)]
pub struct RestletSettings {
    pub script_id: String,
    pub deploy_id: String,
}

impl ServiceSettings {
    /// Load from the process environment (after `.env`, when present).
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("NETSUITE_SYNC_PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "NETSUITE_SYNC_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
        };

        let format = match var("LOG_FORMAT") {
            None => LogFormat::Pretty,
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "LOG_FORMAT",
                value: raw.clone(),
                reason: "expected `pretty` or `json`".to_string(),
            })?,
        };

        Ok(Self {
            host: var("NETSUITE_SYNC_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            restlet: RestletSettings {
                script_id: var("NETSUITE_RESTLET_SCRIPT")
                    .ok_or(ConfigError::MissingKey("NETSUITE_RESTLET_SCRIPT"))?,
                deploy_id: var("NETSUITE_RESTLET_DEPLOY")
                    .unwrap_or_else(|| DEFAULT_DEPLOY_ID.to_string()),
            },
            logging: LoggingSettings { format },
        })
    }
}

// ============================================================================
// Logging
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    pub format: LogFormat,
}

impl LoggingSettings {
    /// Install the global tracing subscriber.
    ///
    /// Filtering follows `RUST_LOG` when set, e.g. `RUST_LOG=debug`.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        match self.format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .with(filter)
                .init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .with(filter)
                .init(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings =
            ServiceSettings::from_lookup(lookup(&[("NETSUITE_RESTLET_SCRIPT", "customscript_sync")]))
                .unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.restlet.script_id, "customscript_sync");
        assert_eq!(settings.restlet.deploy_id, "1");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let settings = ServiceSettings::from_lookup(lookup(&[
            ("NETSUITE_RESTLET_SCRIPT", "12"),
            ("NETSUITE_RESTLET_DEPLOY", "2"),
            ("NETSUITE_SYNC_HOST", "127.0.0.1"),
            ("NETSUITE_SYNC_PORT", "9000"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.restlet.deploy_id, "2");
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_script_is_an_error() {
        let err = ServiceSettings::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("NETSUITE_RESTLET_SCRIPT")));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = ServiceSettings::from_lookup(lookup(&[
            ("NETSUITE_RESTLET_SCRIPT", "12"),
            ("NETSUITE_SYNC_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "NETSUITE_SYNC_PORT", .. }));
    }
}
