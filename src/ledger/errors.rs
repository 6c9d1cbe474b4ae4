// ============================================================================
// Ledger Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{record} not found on NetSuite")]
    RecordNotFound { record: String },

    #[error("NetSuite rejected the request ({code}): {message}")]
    Remote { code: String, message: String },

    #[error("NetSuite returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("NetSuite request failed")]
    Transport(#[source] reqwest::Error),

    #[error("NetSuite reported a successful {operation} without an internal id")]
    MissingRecordRef { operation: &'static str },

    #[error("Malformed NetSuite response")]
    Malformed(#[source] serde_json::Error),
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::RecordNotFound { .. })
    }
}
