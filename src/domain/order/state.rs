use serde::{Deserialize, Serialize};

use super::value_objects::OrderPayload;

// ============================================================================
// Sales Order Import State
// ============================================================================

/// A sales order as it exists in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrderRecord {
    /// Storefront order number.
    pub external_id: String,
    /// Identifier assigned by NetSuite on creation.
    pub internal_id: String,
}

/// Where an order stands relative to the ledger.
///
/// Transitions out of `NotImported` are performed by the ledger during import;
/// this service only observes the state, it never stores it.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderImportState {
    NotImported,
    ImportedUnpaid(SalesOrderRecord),
    ImportedPaid(SalesOrderRecord),
}

impl OrderImportState {
    pub fn resolve(existing: Option<SalesOrderRecord>, order: &OrderPayload) -> Self {
        match existing {
            None => OrderImportState::NotImported,
            Some(record) if order.got_paid() => OrderImportState::ImportedPaid(record),
            Some(record) => OrderImportState::ImportedUnpaid(record),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderImportState::NotImported => "not_imported",
            OrderImportState::ImportedUnpaid(_) => "imported_unpaid",
            OrderImportState::ImportedPaid(_) => "imported_paid",
        }
    }
}
