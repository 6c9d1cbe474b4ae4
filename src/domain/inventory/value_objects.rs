use serde::Serialize;

use crate::domain::errors::PayloadError;

// ============================================================================
// Inventory Value Objects
// ============================================================================

/// The SKU named by an inventory request, trimmed and checked non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sku(String);

impl Sku {
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PayloadError::Empty("sku"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Payload of the `stock:actual` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub sku: String,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_trimmed() {
        assert_eq!(Sku::parse(" SPREE-T-SHIRT ").unwrap().as_str(), "SPREE-T-SHIRT");
    }

    #[test]
    fn test_blank_sku_rejected() {
        assert!(matches!(Sku::parse("   "), Err(PayloadError::Empty("sku"))));
    }

    #[test]
    fn test_stock_level_serialization() {
        let json = serde_json::to_value(StockLevel {
            sku: "MUG".to_string(),
            quantity: 12,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"sku": "MUG", "quantity": 12}));
    }
}
