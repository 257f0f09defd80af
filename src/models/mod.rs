pub mod enums;
mod flow;
mod test_request;
mod user;

pub use flow::*;
pub use test_request::*;
pub use user::*;
