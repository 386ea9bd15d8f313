//! Order persistence: document mapping, filters, patches, and errors.

mod dtos;
pub mod entity;
pub mod error;

pub use dtos::*;
pub use error::*;
