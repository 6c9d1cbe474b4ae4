use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::NetSuiteConfig;
use crate::domain::{EventKind, HandlingResult, IntegrationEvent, PayloadError};
use crate::ledger::LedgerConnector;
use crate::metrics::Metrics;

mod errors;
mod handlers;

pub use errors::{FailureTier, HandlerError};
pub use handlers::{PRODUCT_IMPORT_TOPIC, STOCK_ACTUAL_TOPIC};

// ============================================================================
// Event Orchestrator
// ============================================================================
//
// Orchestrates: IntegrationEvent → tenant config → ledger client → handler
//               → HandlingResult
//
// Every event gets its own ledger client built from its own tenant
// configuration, so serially handled events for different tenants never
// share credentials.
//
// ============================================================================

pub struct EventOrchestrator {
    connector: Arc<dyn LedgerConnector>,
    metrics: Arc<Metrics>,
}

impl EventOrchestrator {
    pub fn new(connector: Arc<dyn LedgerConnector>, metrics: Arc<Metrics>) -> Self {
        Self { connector, metrics }
    }

    /// Handle one event. Always returns exactly one result; failures and
    /// panics inside handlers become 500 results.
    pub async fn handle(&self, event: IntegrationEvent) -> HandlingResult {
        let started = Instant::now();
        let kind = event.kind;
        let message_id = event
            .message_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let span = tracing::info_span!("event", kind = %kind, message_id = %message_id);

        let outcome = AssertUnwindSafe(self.dispatch(&event).instrument(span.clone()))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::Panicked(panic_message(panic.as_ref()))));

        let _entered = span.enter();
        let result = match outcome {
            Ok(result) => result,
            Err(error) => self.fail(kind, error),
        };

        self.metrics
            .record_event(kind.as_str(), result.status_code(), started.elapsed().as_secs_f64());
        tracing::info!(
            status = result.status_code(),
            notifications = result.notifications.len(),
            messages = result.messages.len(),
            "Event handled"
        );

        result
    }

    /// Result for a request that could not even be decoded into an event.
    pub fn reject(&self, kind: EventKind, error: PayloadError) -> HandlingResult {
        let result = self.fail(kind, HandlerError::Payload(error));
        self.metrics.record_event(kind.as_str(), result.status_code(), 0.0);
        result
    }

    async fn dispatch(&self, event: &IntegrationEvent) -> Result<HandlingResult, HandlerError> {
        if event.kind == EventKind::ShipmentNotify {
            return handlers::shipment_notify(event);
        }

        let config = NetSuiteConfig::from_tenant(&event.tenant_config)?;
        let client = self.connector.connect(&config)?;

        tracing::debug!(account = %config.account, sandbox = config.sandbox, "Ledger client ready");

        match event.kind {
            EventKind::ProductSync => handlers::product_sync(client.as_ref(), &config).await,
            EventKind::OrderImport => handlers::order_import(client.as_ref(), event).await,
            EventKind::OrderCancel => handlers::order_cancel(client.as_ref(), event).await,
            EventKind::InventoryQuery => handlers::inventory_query(client.as_ref(), event).await,
            EventKind::ShipmentNotify => handlers::shipment_notify(event),
        }
    }

    fn fail(&self, kind: EventKind, error: HandlerError) -> HandlingResult {
        let tier = error.tier();
        match tier {
            FailureTier::NotFound => tracing::info!(%error, "Record not found"),
            FailureTier::Domain => tracing::warn!(%error, "Ledger refused operation"),
            FailureTier::Unexpected => tracing::error!(error = ?error, "Event handling failed"),
        }

        self.metrics.record_failure(kind.as_str(), tier.as_str());
        error.into_result()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
