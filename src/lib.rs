pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::Services;
pub use domain::{StorefrontError, StorefrontResult};
pub use infra::config::Config;
pub use storage::{MemoryStore, PostgresStore, Store};
