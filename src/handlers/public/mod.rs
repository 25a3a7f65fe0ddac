// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus the few informational endpoints a client may need
// before it has a session.

pub mod auth;
pub mod system;

pub use system::{health, paypal_config, root};
