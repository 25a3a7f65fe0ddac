pub mod auth;
pub mod json;
pub mod response;

pub use auth::{extract_bearer_token, require_auth, AuthUser, BearerToken};
pub use json::{JsonBody, OptionalJsonBody};
pub use response::{ApiResponse, ApiResult};
