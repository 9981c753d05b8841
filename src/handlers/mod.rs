// handlers/mod.rs - HTTP handlers grouped by resource
//
// Access rules live in `app::default_policy`; handlers assume the
// access_control middleware has already run.
pub mod auth;
pub mod products;
pub mod system;
pub mod users;
pub mod validate;
