use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::PayloadError;
use crate::config::TenantConfig;

// ============================================================================
// Integration Events - inbound requests from the order-management bus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ProductSync,
    OrderImport,
    OrderCancel,
    InventoryQuery,
    ShipmentNotify,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::ProductSync,
        EventKind::OrderImport,
        EventKind::OrderCancel,
        EventKind::InventoryQuery,
        EventKind::ShipmentNotify,
    ];

    /// HTTP path the bus posts this kind of event to.
    pub const fn path(self) -> &'static str {
        match self {
            EventKind::ProductSync => "/products",
            EventKind::OrderImport => "/orders",
            EventKind::OrderCancel => "/cancel_order",
            EventKind::InventoryQuery => "/inventory_stock",
            EventKind::ShipmentNotify => "/shipments",
        }
    }

    /// Stable label for logs and metrics.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::ProductSync => "product_sync",
            EventKind::OrderImport => "order_import",
            EventKind::OrderCancel => "order_cancel",
            EventKind::InventoryQuery => "inventory_query",
            EventKind::ShipmentNotify => "shipment_notify",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event delivered by the bus. Consumed once by the orchestrator.
///
/// The payload stays untyped until the handler for `kind` validates the part
/// it needs; see [`IntegrationEvent::payload_field`].
#[derive(Debug, Clone)]
pub struct IntegrationEvent {
    pub kind: EventKind,
    pub message_id: Option<String>,
    pub payload: Value,
    pub tenant_config: TenantConfig,
}

impl IntegrationEvent {
    pub fn new(kind: EventKind, payload: Value, tenant_config: TenantConfig) -> Self {
        Self {
            kind,
            message_id: None,
            payload,
            tenant_config,
        }
    }

    /// Deserialize one top-level field of the payload into its typed form.
    pub fn payload_field<T: DeserializeOwned>(&self, field: &'static str) -> Result<T, PayloadError> {
        let value = self
            .payload
            .get(field)
            .filter(|v| !v.is_null())
            .ok_or(PayloadError::Missing(field))?;

        T::deserialize(value).map_err(|source| PayloadError::Malformed { field, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        number: String,
    }

    #[test]
    fn test_paths_are_unique() {
        let mut paths: Vec<_> = EventKind::ALL.iter().map(|k| k.path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), EventKind::ALL.len());
        assert_eq!(EventKind::InventoryQuery.path(), "/inventory_stock");
    }

    #[test]
    fn test_payload_field_typed() {
        let event = IntegrationEvent::new(
            EventKind::OrderCancel,
            json!({"order": {"number": "R100"}}),
            TenantConfig::new(),
        );

        let probe: Probe = event.payload_field("order").unwrap();
        assert_eq!(probe.number, "R100");
    }

    #[test]
    fn test_payload_field_missing_and_malformed() {
        let event = IntegrationEvent::new(
            EventKind::OrderCancel,
            json!({"order": {"number": 12}, "sku": null}),
            TenantConfig::new(),
        );

        assert!(matches!(
            event.payload_field::<Probe>("order"),
            Err(PayloadError::Malformed { field: "order", .. })
        ));
        assert!(matches!(
            event.payload_field::<String>("sku"),
            Err(PayloadError::Missing("sku"))
        ));
    }
}
