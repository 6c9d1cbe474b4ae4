// ============================================================================
// Ledger Module - access to the NetSuite ledger system
// ============================================================================
//
// - client    - LedgerClient + LedgerConnector traits, OperationOutcome
// - errors    - LedgerError
// - restlet   - HTTPS/JSON implementation against a NetSuite RESTlet
//
// A client is built per event from that event's tenant configuration; no
// client or credential outlives the event it was built for.
//
// ============================================================================

mod client;
mod errors;
mod restlet;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{LedgerClient, LedgerConnector, OperationOutcome};
pub use errors::LedgerError;
pub use restlet::{RestletClient, RestletConnector};
