// Asynchronous audit trail
// Producers enqueue free-text events; a single background consumer owns
// every audit write, so entries persist in enqueue order.

pub mod pipeline;
pub mod types;

pub use pipeline::AuditPipeline;
pub use types::AuditLogEntry;
