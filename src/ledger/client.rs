use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::LedgerError;
use crate::config::NetSuiteConfig;
use crate::domain::order::{OrderPayload, SalesOrderRecord};
use crate::domain::product::CatalogItem;

// ============================================================================
// Ledger Client - the operations the orchestrator needs from NetSuite
// ============================================================================

/// Result of a record-creating ledger call.
///
/// `success == false` is a business rejection (the ledger answered, but said
/// no); transport and protocol failures are `Err(LedgerError)` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub record_ref: Option<String>,
    pub error_message: Option<String>,
}

impl OperationOutcome {
    pub fn succeeded(record_ref: impl Into<String>) -> Self {
        Self {
            success: true,
            record_ref: Some(record_ref.into()),
            error_message: None,
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            record_ref: None,
            error_message: Some(error_message.into()),
        }
    }
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Inventory items modified strictly after `since`.
    async fn search_items_modified_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<CatalogItem>, LedgerError>;

    /// The sales order whose external id is `external_id`, if imported.
    async fn find_sales_order(
        &self,
        external_id: &str,
    ) -> Result<Option<SalesOrderRecord>, LedgerError>;

    /// Create a sales order (plus customer, when new) from a storefront order.
    async fn import_sales_order(&self, order: &OrderPayload)
        -> Result<OperationOutcome, LedgerError>;

    /// Record a payment received against an existing sales order.
    async fn create_customer_deposit(
        &self,
        sales_order: &SalesOrderRecord,
        amount: Decimal,
    ) -> Result<OperationOutcome, LedgerError>;

    /// Refund the deposits taken for a cancelled order.
    async fn create_customer_refund(
        &self,
        order: &OrderPayload,
    ) -> Result<OperationOutcome, LedgerError>;

    /// Units available across all locations.
    ///
    /// An unknown SKU is `Err(LedgerError::RecordNotFound)`.
    async fn quantity_available(&self, sku: &str) -> Result<i64, LedgerError>;
}

/// Builds a client bound to one tenant's credentials.
pub trait LedgerConnector: Send + Sync {
    fn connect(&self, config: &NetSuiteConfig) -> Result<Box<dyn LedgerClient>, LedgerError>;
}
