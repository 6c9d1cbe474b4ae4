// ============================================================================
// Payload Validation Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Request body is not valid JSON")]
    Json(#[source] serde_json::Error),

    #[error("Missing `{0}` in payload")]
    Missing(&'static str),

    #[error("Malformed `{field}` in payload")]
    Malformed {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{0}` cannot be empty")]
    Empty(&'static str),

    #[error("Order {0} has no line items")]
    EmptyItems(String),

    #[error("Invalid quantity {quantity} for item {sku}")]
    InvalidQuantity { sku: String, quantity: i64 },
}
