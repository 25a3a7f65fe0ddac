// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `middleware::require_auth`, which puts the
// caller's `AuthUser` and `BearerToken` into the request extensions.

pub mod auth;
pub mod campaigns;
pub mod external_stocks;
pub mod learning;
pub mod payments;
pub mod preferences;
pub mod stocks;
pub mod transactions;
pub mod utils;
