// Private module declarations
mod server;
mod wire;

// Re-export for public API
pub use server::start_server;
