mod admin;
mod constraints;
mod keeper;
mod queries;
mod user;

pub use admin::*;
pub use constraints::*;
pub use keeper::*;
pub use queries::*;
pub use user::*;
