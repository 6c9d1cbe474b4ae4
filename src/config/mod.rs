// ============================================================================
// Configuration
// ============================================================================
//
// Two layers of configuration:
// - Tenant configuration: key/value parameters sent by the bus with every
//   event (NetSuite credentials, sync cursor). Never cached between events.
// - Service settings: process-wide settings read from the environment once
//   at startup (bind address, RESTlet deployment, log format).
//
// ============================================================================

mod errors;
mod service;
mod tenant;

pub use errors::ConfigError;
pub use service::{LogFormat, LoggingSettings, RestletSettings, ServiceSettings};
pub use tenant::{ConfigKey, NetSuiteConfig, TenantConfig};
pub(crate) use tenant::format_timestamp;
