// ============================================================================
// Inventory Domain - stock level queries
// ============================================================================

pub mod value_objects;

pub use value_objects::*;
