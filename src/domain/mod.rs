pub mod object_id;
pub mod order;
pub mod status;
pub mod user;

pub use object_id::*;
pub use order::*;
pub use status::*;
pub use user::*;
