// ============================================================================
// Product Domain - catalog items exported from the ledger
// ============================================================================

pub mod value_objects;

pub use value_objects::*;
