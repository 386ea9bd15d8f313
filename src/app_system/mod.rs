//! System orchestration: configuration, tracing, startup, and shutdown.

pub mod config;
pub mod order_system;
pub mod tracing;

pub use self::config::*;
pub use self::order_system::*;
pub use self::tracing::{setup_tracing, LogFormat};
