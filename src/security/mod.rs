//! Request identity and role checks.

pub mod guard;
pub mod token;

pub use guard::*;
pub use token::*;
