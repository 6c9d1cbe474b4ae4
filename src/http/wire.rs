use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::TenantConfig;
use crate::domain::{EventKind, HandlingResult, IntegrationEvent, NotificationLevel, PayloadError};

// ============================================================================
// Bus Wire Format
// ============================================================================

/// Request body posted by the bus.
#[derive(Debug, Deserialize)]
pub struct BusRequest {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

impl BusRequest {
    pub fn decode(body: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(body).map_err(PayloadError::Json)
    }

    /// Split tenant parameters out of the payload and build the event.
    pub fn into_event(self, kind: EventKind) -> Result<IntegrationEvent, PayloadError> {
        let tenant_config = match self.payload.get("parameters") {
            None | Some(Value::Null) => TenantConfig::new(),
            Some(raw) => TenantConfig::deserialize(raw).map_err(|source| {
                PayloadError::Malformed {
                    field: "parameters",
                    source,
                }
            })?,
        };

        Ok(IntegrationEvent {
            kind,
            message_id: self.message_id,
            payload: self.payload,
            tenant_config,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BusResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub notifications: Vec<BusNotification>,
    pub messages: Vec<BusMessage>,
    pub parameters: Vec<BusParameter>,
}

#[derive(Debug, Serialize)]
pub struct BusNotification {
    pub level: NotificationLevel,
    pub subject: String,
    pub description: String,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct BusMessage {
    pub message: String,
    pub payload: Value,
}

#[derive(Debug, Serialize)]
pub struct BusParameter {
    pub name: &'static str,
    pub value: Value,
}

impl BusResponse {
    pub fn new(message_id: Option<String>, result: HandlingResult) -> Self {
        let parameters = result
            .parameters
            .iter()
            .map(|(key, value)| BusParameter {
                name: key.as_str(),
                value: value.clone(),
            })
            .collect();

        Self {
            message_id,
            notifications: result
                .notifications
                .into_iter()
                .map(|n| BusNotification {
                    level: n.level,
                    subject: n.message.clone(),
                    description: n.message,
                    context: n.context,
                })
                .collect(),
            messages: result
                .messages
                .into_iter()
                .map(|m| BusMessage {
                    message: m.topic,
                    payload: m.payload,
                })
                .collect(),
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigKey;
    use crate::domain::Notification;
    use serde_json::json;

    #[test]
    fn test_decode_and_split_parameters() {
        let body = json!({
            "message_id": "518726r84910000004",
            "payload": {
                "sku": "MUG",
                "parameters": [{"name": "netsuite.account", "value": "TSTDRV123"}]
            }
        });

        let event = BusRequest::decode(body.to_string().as_bytes())
            .unwrap()
            .into_event(EventKind::InventoryQuery)
            .unwrap();

        assert_eq!(event.kind, EventKind::InventoryQuery);
        assert_eq!(event.message_id.as_deref(), Some("518726r84910000004"));
        assert_eq!(event.tenant_config.get(ConfigKey::Account), Some(&json!("TSTDRV123")));
        assert_eq!(event.payload["sku"], "MUG");
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        assert!(matches!(BusRequest::decode(b"{not json"), Err(PayloadError::Json(_))));
    }

    #[test]
    fn test_malformed_parameters() {
        let err = BusRequest::decode(br#"{"payload": {"parameters": 5}}"#)
            .unwrap()
            .into_event(EventKind::ProductSync)
            .unwrap_err();
        assert!(matches!(err, PayloadError::Malformed { field: "parameters", .. }));
    }

    #[test]
    fn test_response_encoding() {
        let result = HandlingResult::ok()
            .message("stock:actual", json!({"sku": "MUG", "quantity": 3}))
            .unwrap()
            .parameter(ConfigKey::LastUpdatedAfter, "2014-02-20T12:00:00Z")
            .notify(Notification::error("boom").with_context("backtrace", "cause"));

        let json = serde_json::to_value(BusResponse::new(Some("m1".to_string()), result)).unwrap();

        assert_eq!(json["message_id"], "m1");
        assert_eq!(
            json["notifications"][0],
            json!({"level": "error", "subject": "boom", "description": "boom", "backtrace": "cause"})
        );
        assert_eq!(json["messages"][0]["message"], "stock:actual");
        assert_eq!(
            json["parameters"],
            json!([{"name": "netsuite.last_updated_after", "value": "2014-02-20T12:00:00Z"}])
        );
    }
}
