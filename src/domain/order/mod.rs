// ============================================================================
// Order Domain - orders received from the storefront
// ============================================================================
//
// - Value objects (OrderPayload, LineItem, Payment, Address, Totals)
// - Import state (NotImported / ImportedUnpaid / ImportedPaid), derived per
//   event from the ledger lookup and never stored locally
//
// ============================================================================

pub mod state;
pub mod value_objects;

pub use state::*;
pub use value_objects::*;
