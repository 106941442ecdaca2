//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireMerchant`] -- Requires `merchant` or `admin` role.
//! - [`rbac::RequireBooker`] -- Requires `customer`, `agent`, or `admin` role.

pub mod auth;
pub mod rbac;
