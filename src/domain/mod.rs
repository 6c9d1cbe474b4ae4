// ============================================================================
// Domain Layer - Integration events and their results
// ============================================================================
//
// Each business area has its own subdirectory with:
// - Value objects (strongly typed payloads received from the bus)
// - Validation rules
//
// Shared types:
// - IntegrationEvent: one inbound event from the bus
// - HandlingResult: the single terminal answer returned for it
//
// This layer performs no I/O; ledger calls live in `crate::ledger` and the
// per-event flow lives in `crate::orchestrator`.
//
// ============================================================================

pub mod errors;
pub mod event;
pub mod inventory;
pub mod order;
pub mod product;
pub mod result;

pub use errors::*;
pub use event::*;
pub use result::*;
