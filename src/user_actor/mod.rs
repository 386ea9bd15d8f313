//! User persistence and the errors of user operations.

pub mod entity;
pub mod error;

pub use entity::UserPatch;
pub use error::*;
