use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::PayloadError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Payment state that marks money as actually captured.
pub const COMPLETED_PAYMENT: &str = "completed";

/// An order as sent by the storefront under the `order` payload key.
///
/// `number` is the storefront's identifier; it becomes the sales order's
/// external id in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub placed_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub item: Decimal,
    pub adjustment: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub payment: Decimal,
    pub order: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Storefront SKU; matches the ledger item id.
    pub product_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub number: Option<String>,
    pub status: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl Payment {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case(COMPLETED_PAYMENT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub firstname: String,
    pub lastname: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
    pub phone: Option<String>,
}

impl OrderPayload {
    /// Rules every order event must satisfy before any ledger call.
    pub fn validate_reference(&self) -> Result<(), PayloadError> {
        if self.number.trim().is_empty() {
            return Err(PayloadError::Empty("order.number"));
        }
        Ok(())
    }

    /// Rules for orders that may be imported as new sales orders.
    pub fn validate_for_import(&self) -> Result<(), PayloadError> {
        self.validate_reference()?;

        if self.line_items.is_empty() {
            return Err(PayloadError::EmptyItems(self.number.clone()));
        }

        for item in &self.line_items {
            if item.product_id.trim().is_empty() {
                return Err(PayloadError::Empty("line_items.product_id"));
            }
            if item.quantity <= 0 {
                return Err(PayloadError::InvalidQuantity {
                    sku: item.product_id.clone(),
                    quantity: item.quantity,
                });
            }
        }

        Ok(())
    }

    /// True once at least one payment has been captured.
    pub fn got_paid(&self) -> bool {
        self.payments.iter().any(Payment::is_completed)
    }

    /// Sum of captured payments; the amount a customer deposit records.
    pub fn paid_amount(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.is_completed())
            .map(|p| p.amount)
            .sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn order(payments: serde_json::Value) -> OrderPayload {
        serde_json::from_value(json!({
            "number": "R154085346",
            "email": "spree@example.com",
            "totals": {"item": "99.95", "order": 109.95},
            "line_items": [{"product_id": "SPREE-T-SHIRT", "name": "Spree T-Shirt", "quantity": 1, "price": 99.95}],
            "payments": payments
        }))
        .unwrap()
    }

    #[test]
    fn test_order_deserialization() {
        let order = order(json!([]));

        assert_eq!(order.number, "R154085346");
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.totals.item, Decimal::new(9995, 2));
        assert_eq!(order.totals.order, Decimal::new(10995, 2));
        assert!(order.shipping_address.is_none());
    }

    #[test]
    fn test_got_paid_requires_completed_payment() {
        let pending = order(json!([{"status": "pending", "amount": 109.95}]));
        assert!(!pending.got_paid());
        assert_eq!(pending.paid_amount(), Decimal::ZERO);

        let paid = order(json!([
            {"status": "failed", "amount": 5},
            {"status": "completed", "amount": "100.00"},
            {"status": "COMPLETED", "amount": "9.95"}
        ]));
        assert!(paid.got_paid());
        assert_eq!(paid.paid_amount(), Decimal::new(10995, 2));
    }

    #[test]
    fn test_validate_for_import() {
        assert!(order(json!([])).validate_for_import().is_ok());

        let mut no_items = order(json!([]));
        no_items.line_items.clear();
        assert!(matches!(
            no_items.validate_for_import(),
            Err(PayloadError::EmptyItems(number)) if number == "R154085346"
        ));

        let mut bad_quantity = order(json!([]));
        bad_quantity.line_items[0].quantity = 0;
        assert!(matches!(
            bad_quantity.validate_for_import(),
            Err(PayloadError::InvalidQuantity { quantity: 0, .. })
        ));
    }

    #[test]
    fn test_blank_number_rejected() {
        let mut blank = order(json!([]));
        blank.number = "  ".to_string();
        assert!(matches!(
            blank.validate_reference(),
            Err(PayloadError::Empty("order.number"))
        ));
    }
}
