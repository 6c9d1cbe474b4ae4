use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::errors::ConfigError;

// ============================================================================
// Tenant Configuration - parameters delivered with each event
// ============================================================================

/// The closed set of configuration keys this service understands.
///
/// Configuration updates handed back to the bus are keyed by this enum, so an
/// update can never name a key outside the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    Sandbox,
    Email,
    Password,
    Account,
    RoleId,
    LastUpdatedAfter,
}

impl ConfigKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Sandbox => "netsuite.sandbox",
            ConfigKey::Email => "netsuite.email",
            ConfigKey::Password => "netsuite.password",
            ConfigKey::Account => "netsuite.account",
            ConfigKey::RoleId => "netsuite.role_id",
            ConfigKey::LastUpdatedAfter => "netsuite.last_updated_after",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConfigKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Raw key/value configuration for one tenant.
///
/// The bus sends parameters either as a list of `{name, value}` pairs or as a
/// plain JSON object; both deserialize into the same map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawParameters")]
pub struct TenantConfig {
    entries: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawParameters {
    List(Vec<Parameter>),
    Map(BTreeMap<String, Value>),
}

#[derive(Deserialize)]
struct Parameter {
    name: String,
    #[serde(default)]
    value: Value,
}

impl From<RawParameters> for TenantConfig {
    fn from(raw: RawParameters) -> Self {
        let entries = match raw {
            RawParameters::List(list) => list.into_iter().map(|p| (p.name, p.value)).collect(),
            RawParameters::Map(map) => map,
        };
        Self { entries }
    }
}

impl TenantConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ConfigKey, value: impl Into<Value>) -> Self {
        self.entries.insert(key.as_str().to_string(), value.into());
        self
    }

    pub fn get(&self, key: ConfigKey) -> Option<&Value> {
        self.entries
            .get(key.as_str())
            .filter(|value| !value.is_null())
    }

    fn require_string(&self, key: ConfigKey) -> Result<String, ConfigError> {
        match self.get(key) {
            None => Err(ConfigError::MissingKey(key.as_str())),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(ConfigError::MissingKey(key.as_str()))
            }
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(invalid(key, other, "expected a string")),
        }
    }

    fn bool_or(&self, key: ConfigKey, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "" => Ok(default),
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(invalid(key, &Value::String(s.clone()), "expected a boolean")),
            },
            Some(other) => Err(invalid(key, other, "expected a boolean")),
        }
    }

    fn u32_or(&self, key: ConfigKey, default: u32) -> Result<u32, ConfigError> {
        let parsed = match self.get(key) {
            None => return Ok(default),
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(default),
            Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
            Some(_) => None,
        };

        parsed.ok_or_else(|| {
            invalid(
                key,
                self.get(key).unwrap_or(&Value::Null),
                "expected a positive integer",
            )
        })
    }

    fn cursor(&self, key: ConfigKey) -> Result<Option<SyncCursor>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => parse_timestamp(s.trim())
                .map(|at| {
                    Some(SyncCursor {
                        at,
                        raw: s.trim().to_string(),
                    })
                })
                .map_err(|source| ConfigError::InvalidTimestamp {
                    key: key.as_str(),
                    value: s.clone(),
                    source,
                }),
            Some(other) => Err(invalid(key, other, "expected an RFC 3339 timestamp")),
        }
    }
}

fn invalid(key: ConfigKey, value: &Value, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.as_str(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Accepts RFC 3339 and the zone-less `YYYY-MM-DDTHH:MM:SS` form, read as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

/// Canonical rendering used for the sync cursor and notification text.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The `last_updated_after` value as configured, plus its UTC instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncCursor {
    pub at: DateTime<Utc>,
    /// Echoed back to the tenant as written.
    pub raw: String,
}

// ============================================================================
// NetSuite Configuration - validated view of a tenant's parameters
// ============================================================================

#[derive(Clone, PartialEq)]
pub struct NetSuiteConfig {
    pub sandbox: bool,
    pub email: String,
    pub password: String,
    pub account: String,
    pub role_id: u32,
    pub last_updated_after: Option<SyncCursor>,
}

impl NetSuiteConfig {
    pub const DEFAULT_ROLE_ID: u32 = 3;

    pub fn from_tenant(config: &TenantConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            sandbox: config.bool_or(ConfigKey::Sandbox, false)?,
            email: config.require_string(ConfigKey::Email)?,
            password: config.require_string(ConfigKey::Password)?,
            account: config.require_string(ConfigKey::Account)?,
            role_id: config.u32_or(ConfigKey::RoleId, Self::DEFAULT_ROLE_ID)?,
            last_updated_after: config.cursor(ConfigKey::LastUpdatedAfter)?,
        })
    }

    /// The product sync cursor; product syncs cannot run without one.
    pub fn sync_cursor(&self) -> Result<&SyncCursor, ConfigError> {
        self.last_updated_after
            .as_ref()
            .ok_or(ConfigError::MissingKey(ConfigKey::LastUpdatedAfter.as_str()))
    }
}

impl fmt::Debug for NetSuiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetSuiteConfig")
            .field("sandbox", &self.sandbox)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("account", &self.account)
            .field("role_id", &self.role_id)
            .field("last_updated_after", &self.last_updated_after)
            .finish()
    }
}
