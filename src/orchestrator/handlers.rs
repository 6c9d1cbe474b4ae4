use crate::config::{format_timestamp, ConfigKey, NetSuiteConfig};
use crate::domain::inventory::{Sku, StockLevel};
use crate::domain::order::{OrderImportState, OrderPayload};
use crate::domain::product::ProductBatch;
use crate::domain::{HandlingResult, IntegrationEvent, Notification};
use crate::ledger::{LedgerClient, LedgerError, OperationOutcome};

use super::errors::HandlerError;

// ============================================================================
// Per-kind event handlers
// ============================================================================
//
// Each handler validates its payload, runs its ledger calls in order, and
// returns either a finished HandlingResult or a HandlerError for the caller
// to map. None of them keeps state between events.
//
// ============================================================================

pub const PRODUCT_IMPORT_TOPIC: &str = "product:import";
pub const STOCK_ACTUAL_TOPIC: &str = "stock:actual";

pub(super) async fn product_sync(
    client: &dyn LedgerClient,
    config: &NetSuiteConfig,
) -> Result<HandlingResult, HandlerError> {
    let since = config.sync_cursor()?;
    let items = client.search_items_modified_since(since.at).await?;

    let Some(batch) = ProductBatch::from_items(items) else {
        tracing::info!(since = %since.raw, "No NetSuite items changed");
        return Ok(HandlingResult::ok().notify(Notification::info(format!(
            "No product updated since {}",
            since.raw
        ))));
    };

    let cursor = format_timestamp(&batch.last_modified);
    tracing::info!(products = batch.len(), cursor = %cursor, "Fetched updated NetSuite items");

    Ok(HandlingResult::ok()
        .message(PRODUCT_IMPORT_TOPIC, batch.import_payload())?
        .parameter(ConfigKey::LastUpdatedAfter, cursor.clone())
        .notify(Notification::info(format!(
            "NetSuite Items imported as products up to {}",
            cursor
        ))))
}

pub(super) async fn order_import(
    client: &dyn LedgerClient,
    event: &IntegrationEvent,
) -> Result<HandlingResult, HandlerError> {
    let order: OrderPayload = event.payload_field("order")?;
    order.validate_reference()?;

    let existing = client.find_sales_order(&order.number).await?;
    let state = OrderImportState::resolve(existing, &order);

    tracing::debug!(external_id = %order.number, state = state.label(), "Resolved order state");

    match state {
        OrderImportState::NotImported => {
            order.validate_for_import()?;

            let outcome = client.import_sales_order(&order).await?;
            require_success(&outcome, || {
                format!("Failed to import order {} into Netsuite", order.number)
            })?;

            let internal_id = outcome.record_ref.as_deref().ok_or(LedgerError::MissingRecordRef {
                operation: "sales order import",
            })?;
            tracing::info!(
                external_id = %order.number,
                internal_id = %internal_id,
                "Sales order imported"
            );

            Ok(HandlingResult::ok().notify(Notification::info(format!(
                "Order {} imported into NetSuite (internal id {})",
                order.number, internal_id
            ))))
        }
        OrderImportState::ImportedPaid(sales_order) => {
            let amount = order.paid_amount();
            let outcome = client.create_customer_deposit(&sales_order, amount).await?;
            require_success(&outcome, || {
                format!(
                    "Failed to create a Customer Deposit for NetSuite Sales Order {}",
                    sales_order.external_id
                )
            })?;

            tracing::info!(
                external_id = %sales_order.external_id,
                amount = %amount,
                "Customer deposit created"
            );

            Ok(HandlingResult::ok().notify(Notification::info(format!(
                "Customer Deposit created for NetSuite Sales Order {}",
                sales_order.external_id
            ))))
        }
        OrderImportState::ImportedUnpaid(sales_order) => {
            tracing::debug!(
                external_id = %sales_order.external_id,
                "Order already imported and unpaid, nothing to do"
            );
            Ok(HandlingResult::ok())
        }
    }
}

pub(super) async fn order_cancel(
    client: &dyn LedgerClient,
    event: &IntegrationEvent,
) -> Result<HandlingResult, HandlerError> {
    let order: OrderPayload = event.payload_field("order")?;
    order.validate_reference()?;

    let outcome = client.create_customer_refund(&order).await?;
    require_success(&outcome, || {
        format!(
            "Failed to create a Customer Refund for NetSuite Sales Order {}",
            order.number
        )
    })?;

    tracing::info!(external_id = %order.number, "Customer refund created");

    Ok(HandlingResult::ok().notify(Notification::info(format!(
        "Customer Refund created for NetSuite Sales Order {}",
        order.number
    ))))
}

pub(super) async fn inventory_query(
    client: &dyn LedgerClient,
    event: &IntegrationEvent,
) -> Result<HandlingResult, HandlerError> {
    let raw: String = event.payload_field("sku")?;
    let sku = Sku::parse(&raw)?;

    let quantity = match client.quantity_available(sku.as_str()).await {
        Ok(quantity) => quantity,
        Err(err) if err.is_not_found() => {
            return Err(HandlerError::NotFound(format!(
                "Inventory Item {} not found on NetSuite",
                sku.as_str()
            )));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(sku = %sku.as_str(), quantity, "Stock level fetched");

    Ok(HandlingResult::ok()
        .message(
            STOCK_ACTUAL_TOPIC,
            StockLevel {
                sku: sku.as_str().to_string(),
                quantity,
            },
        )?
        .notify(Notification::info(format!(
            "{} units available of {} according to NetSuite",
            quantity,
            sku.as_str()
        ))))
}

/// Shipments are accepted and acknowledged; nothing is sent to the ledger yet.
pub(super) fn shipment_notify(_event: &IntegrationEvent) -> Result<HandlingResult, HandlerError> {
    Ok(HandlingResult::ok())
}

fn require_success(
    outcome: &OperationOutcome,
    message: impl FnOnce() -> String,
) -> Result<(), HandlerError> {
    if outcome.success {
        return Ok(());
    }

    let message = message();
    tracing::warn!(
        reason = outcome.error_message.as_deref().unwrap_or("none given"),
        "{}",
        message
    );
    Err(HandlerError::domain(message, outcome.error_message.clone()))
}
