use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{LedgerClient, LedgerConnector, OperationOutcome};
use super::errors::LedgerError;
use crate::config::{format_timestamp, NetSuiteConfig, RestletSettings};
use crate::domain::order::{OrderPayload, SalesOrderRecord};
use crate::domain::product::CatalogItem;

// ============================================================================
// RESTlet Ledger Client
// ============================================================================
//
// Talks JSON to a RESTlet script deployed in the tenant's NetSuite account.
// Every request is a POST of `{"operation": ..., ...}`; every response is
// `{"success": bool, "data": ..., "error": {"code", "message"}}`.
//
// ============================================================================

const PRODUCTION_HOST: &str = "https://rest.netsuite.com";
const SANDBOX_HOST: &str = "https://rest.sandbox.netsuite.com";
const RESTLET_PATH: &str = "/app/site/hosting/restlet.nl";

/// Ledger calls wait for as long as NetSuite takes; callers own timeouts.
const READ_TIMEOUT: Duration = Duration::from_secs(100_000);

/// NetSuite's error code for a missing record.
const RECORD_NOT_FOUND: &str = "RCRD_DSNT_EXIST";

pub struct RestletConnector {
    settings: RestletSettings,
}

impl RestletConnector {
    pub fn new(settings: RestletSettings) -> Self {
        Self { settings }
    }
}

impl LedgerConnector for RestletConnector {
    fn connect(&self, config: &NetSuiteConfig) -> Result<Box<dyn LedgerClient>, LedgerError> {
        Ok(Box::new(RestletClient::new(&self.settings, config)?))
    }
}

pub struct RestletClient {
    http: reqwest::Client,
    endpoint: String,
    script_id: String,
    deploy_id: String,
    account: String,
    authorization: String,
}

impl RestletClient {
    pub fn new(settings: &RestletSettings, config: &NetSuiteConfig) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(READ_TIMEOUT)
            .build()
            .map_err(LedgerError::Transport)?;

        Ok(Self {
            http,
            endpoint: endpoint_for(config.sandbox),
            script_id: settings.script_id.clone(),
            deploy_id: settings.deploy_id.clone(),
            account: config.account.clone(),
            authorization: authorization_header(config),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, request: RestletRequest<'_>) -> Result<RestletResponse, LedgerError> {
        tracing::debug!(
            operation = request.name(),
            account = %self.account,
            "Calling NetSuite RESTlet"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("script", &self.script_id), ("deploy", &self.deploy_id)])
            .header(AUTHORIZATION, &self.authorization)
            .json(&request)
            .send()
            .await
            .map_err(LedgerError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(LedgerError::Transport)?;

        if !status.is_success() {
            tracing::warn!(
                operation = request.name(),
                status = status.as_u16(),
                "NetSuite RESTlet returned an error status"
            );
            return Err(LedgerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(LedgerError::Malformed)
    }
}

fn endpoint_for(sandbox: bool) -> String {
    let host = if sandbox { SANDBOX_HOST } else { PRODUCTION_HOST };
    format!("{}{}", host, RESTLET_PATH)
}

fn authorization_header(config: &NetSuiteConfig) -> String {
    format!(
        "NLAuth nlauth_account={}, nlauth_email={}, nlauth_signature={}, nlauth_role={}",
        config.account, config.email, config.password, config.role_id
    )
}

#[async_trait]
impl LedgerClient for RestletClient {
    async fn search_items_modified_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<CatalogItem>, LedgerError> {
        self.call(RestletRequest::SearchItems {
            modified_after: format_timestamp(&since),
        })
        .await?
        .into_data(|| "Item search".to_string())
    }

    async fn find_sales_order(
        &self,
        external_id: &str,
    ) -> Result<Option<SalesOrderRecord>, LedgerError> {
        let response = self
            .call(RestletRequest::FindSalesOrder { external_id })
            .await?;

        if response.is_not_found() {
            return Ok(None);
        }
        response.into_data(|| format!("Sales Order {}", external_id))
    }

    async fn import_sales_order(
        &self,
        order: &OrderPayload,
    ) -> Result<OperationOutcome, LedgerError> {
        Ok(self
            .call(RestletRequest::ImportSalesOrder { order })
            .await?
            .into_outcome())
    }

    async fn create_customer_deposit(
        &self,
        sales_order: &SalesOrderRecord,
        amount: Decimal,
    ) -> Result<OperationOutcome, LedgerError> {
        Ok(self
            .call(RestletRequest::CreateCustomerDeposit { sales_order, amount })
            .await?
            .into_outcome())
    }

    async fn create_customer_refund(
        &self,
        order: &OrderPayload,
    ) -> Result<OperationOutcome, LedgerError> {
        Ok(self
            .call(RestletRequest::CreateCustomerRefund { order })
            .await?
            .into_outcome())
    }

    async fn quantity_available(&self, sku: &str) -> Result<i64, LedgerError> {
        let stock: StockData = self
            .call(RestletRequest::QuantityAvailable { sku })
            .await?
            .into_data(|| format!("Inventory Item {}", sku))?;

        // NetSuite reports fractional quantities for some units of measure
        Ok(stock.quantity_available.floor() as i64)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
enum RestletRequest<'a> {
    SearchItems {
        modified_after: String,
    },
    FindSalesOrder {
        external_id: &'a str,
    },
    ImportSalesOrder {
        order: &'a OrderPayload,
    },
    CreateCustomerDeposit {
        sales_order: &'a SalesOrderRecord,
        amount: Decimal,
    },
    CreateCustomerRefund {
        order: &'a OrderPayload,
    },
    QuantityAvailable {
        sku: &'a str,
    },
}

impl RestletRequest<'_> {
    fn name(&self) -> &'static str {
        match self {
            RestletRequest::SearchItems { .. } => "search_items",
            RestletRequest::FindSalesOrder { .. } => "find_sales_order",
            RestletRequest::ImportSalesOrder { .. } => "import_sales_order",
            RestletRequest::CreateCustomerDeposit { .. } => "create_customer_deposit",
            RestletRequest::CreateCustomerRefund { .. } => "create_customer_refund",
            RestletRequest::QuantityAvailable { .. } => "quantity_available",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestletResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<RestletFault>,
}

#[derive(Debug, Deserialize)]
struct RestletFault {
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct StockData {
    quantity_available: f64,
}

impl RestletResponse {
    fn is_not_found(&self) -> bool {
        !self.success
            && self
                .error
                .as_ref()
                .is_some_and(|fault| fault.code == RECORD_NOT_FOUND)
    }

    fn into_data<T: DeserializeOwned>(
        self,
        record: impl FnOnce() -> String,
    ) -> Result<T, LedgerError> {
        if !self.success {
            return Err(self.into_error(record));
        }
        serde_json::from_value(self.data).map_err(LedgerError::Malformed)
    }

    fn into_error(self, record: impl FnOnce() -> String) -> LedgerError {
        match self.error {
            Some(fault) if fault.code == RECORD_NOT_FOUND => {
                LedgerError::RecordNotFound { record: record() }
            }
            Some(fault) => LedgerError::Remote {
                code: fault.code,
                message: fault.message,
            },
            None => LedgerError::Remote {
                code: "UNEXPECTED_ERROR".to_string(),
                message: "RESTlet reported failure without an error".to_string(),
            },
        }
    }

    fn into_outcome(self) -> OperationOutcome {
        if self.success {
            return OperationOutcome {
                success: true,
                record_ref: internal_id(&self.data),
                error_message: None,
            };
        }

        let message = self
            .error
            .map(|fault| format!("{}: {}", fault.code, fault.message))
            .unwrap_or_else(|| "RESTlet reported failure without an error".to_string());
        OperationOutcome::failed(message)
    }
}

fn internal_id(data: &Value) -> Option<String> {
    match data.get("internal_id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
