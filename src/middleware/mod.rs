pub mod auth;
pub mod response;

pub use auth::{access_control, bearer_token};
pub use response::{ApiResponse, ApiResult};
