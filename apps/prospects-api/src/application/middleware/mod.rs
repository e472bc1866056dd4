pub mod auth;
pub mod panic;

pub use auth::{AuthenticatedUser, bearer_auth};
pub use panic::PanicResponder;
