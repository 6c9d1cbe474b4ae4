use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ConfigKey;

// ============================================================================
// Handling Result - the one terminal answer for an IntegrationEvent
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    Failed,
}

impl ResultStatus {
    pub const fn code(self) -> u16 {
        match self {
            ResultStatus::Ok => 200,
            ResultStatus::Failed => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Extra diagnostic fields, e.g. `backtrace`.
    pub context: Map<String, Value>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            context: Map::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            context: Map::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: Value,
}

/// Configuration changes handed back to the bus.
///
/// Keyed by [`ConfigKey`], so only recognized keys can ever be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigUpdates(BTreeMap<ConfigKey, Value>);

impl ConfigUpdates {
    pub fn set(&mut self, key: ConfigKey, value: impl Into<Value>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: ConfigKey) -> Option<&Value> {
        self.0.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlingResult {
    pub status: ResultStatus,
    pub notifications: Vec<Notification>,
    pub messages: Vec<OutboundMessage>,
    pub parameters: ConfigUpdates,
}

impl HandlingResult {
    /// A 200 result with an empty body.
    pub fn ok() -> Self {
        Self {
            status: ResultStatus::Ok,
            notifications: Vec::new(),
            messages: Vec::new(),
            parameters: ConfigUpdates::default(),
        }
    }

    /// A 500 result carrying a single error notification.
    pub fn failed(notification: Notification) -> Self {
        Self {
            status: ResultStatus::Failed,
            notifications: vec![notification],
            messages: Vec::new(),
            parameters: ConfigUpdates::default(),
        }
    }

    pub fn notify(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn message(
        mut self,
        topic: impl Into<String>,
        payload: impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_value(payload)?;
        self.messages.push(OutboundMessage {
            topic: topic.into(),
            payload,
        });
        Ok(self)
    }

    pub fn parameter(mut self, key: ConfigKey, value: impl Into<Value>) -> Self {
        self.parameters.set(key, value);
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }
}
