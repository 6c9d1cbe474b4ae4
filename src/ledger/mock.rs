use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::client::{LedgerClient, LedgerConnector, OperationOutcome};
use super::errors::LedgerError;
use crate::config::NetSuiteConfig;
use crate::domain::order::{OrderPayload, SalesOrderRecord};
use crate::domain::product::CatalogItem;

// ============================================================================
// In-memory ledger for tests
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) enum StockReply {
    Quantity(i64),
    NotFound,
    Unavailable,
}

/// Scripted ledger answers plus a log of the calls made against it.
#[derive(Clone)]
pub(crate) struct MockLedger {
    pub items: Vec<CatalogItem>,
    pub existing_order: Option<SalesOrderRecord>,
    pub import_outcome: OperationOutcome,
    pub deposit_outcome: OperationOutcome,
    pub refund_outcome: OperationOutcome,
    pub stock: StockReply,
    /// Every call fails with a remote error when set.
    pub offline: bool,
    /// Panics inside `find_sales_order` when set.
    pub panic_on_lookup: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            existing_order: None,
            import_outcome: OperationOutcome::succeeded("1001"),
            deposit_outcome: OperationOutcome::succeeded("2001"),
            refund_outcome: OperationOutcome::succeeded("3001"),
            stock: StockReply::Quantity(0),
            offline: false,
            panic_on_lookup: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<(), LedgerError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.offline {
            return Err(LedgerError::Remote {
                code: "SSS_REQUEST_TIME_EXCEEDED".to_string(),
                message: "NetSuite did not answer".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn search_items_modified_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<CatalogItem>, LedgerError> {
        self.record(format!("search_items_modified_since:{}", since.to_rfc3339()))?;
        Ok(self
            .items
            .iter()
            .filter(|item| item.last_modified > since)
            .cloned()
            .collect())
    }

    async fn find_sales_order(
        &self,
        external_id: &str,
    ) -> Result<Option<SalesOrderRecord>, LedgerError> {
        self.record(format!("find_sales_order:{}", external_id))?;
        if self.panic_on_lookup {
            panic!("lookup exploded");
        }
        Ok(self.existing_order.clone())
    }

    async fn import_sales_order(
        &self,
        order: &OrderPayload,
    ) -> Result<OperationOutcome, LedgerError> {
        self.record(format!("import_sales_order:{}", order.number))?;
        Ok(self.import_outcome.clone())
    }

    async fn create_customer_deposit(
        &self,
        sales_order: &SalesOrderRecord,
        amount: Decimal,
    ) -> Result<OperationOutcome, LedgerError> {
        self.record(format!(
            "create_customer_deposit:{}:{}",
            sales_order.internal_id, amount
        ))?;
        Ok(self.deposit_outcome.clone())
    }

    async fn create_customer_refund(
        &self,
        order: &OrderPayload,
    ) -> Result<OperationOutcome, LedgerError> {
        self.record(format!("create_customer_refund:{}", order.number))?;
        Ok(self.refund_outcome.clone())
    }

    async fn quantity_available(&self, sku: &str) -> Result<i64, LedgerError> {
        self.record(format!("quantity_available:{}", sku))?;
        match self.stock {
            StockReply::Quantity(quantity) => Ok(quantity),
            StockReply::NotFound => Err(LedgerError::RecordNotFound {
                record: format!("Inventory Item {}", sku),
            }),
            StockReply::Unavailable => Err(LedgerError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            }),
        }
    }
}

/// Hands out clones of one scripted ledger and remembers who connected.
#[derive(Clone)]
pub(crate) struct MockConnector {
    pub ledger: MockLedger,
    connections: Arc<Mutex<Vec<NetSuiteConfig>>>,
}

impl MockConnector {
    pub fn new(ledger: MockLedger) -> Self {
        Self {
            ledger,
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn connections(&self) -> Vec<NetSuiteConfig> {
        self.connections
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl LedgerConnector for MockConnector {
    fn connect(&self, config: &NetSuiteConfig) -> Result<Box<dyn LedgerClient>, LedgerError> {
        if let Ok(mut connections) = self.connections.lock() {
            connections.push(config.clone());
        }
        Ok(Box::new(self.ledger.clone()))
    }
}
