//! Typed clients over the document collections. These are the services the
//! HTTP layer talks to.

#[macro_use]
mod macros;
pub mod order_client;
pub mod user_client;

pub use order_client::OrderClient;
pub use user_client::UserClient;
