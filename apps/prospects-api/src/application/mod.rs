// Declare sub-modules within the application layer
pub mod commands;
pub mod dispatch;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod queries;
pub mod response;
