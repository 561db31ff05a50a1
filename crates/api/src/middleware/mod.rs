//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, from a JWT Bearer token.
//! - [`rbac::RequireAuth`] -- any authenticated caller.
//! - [`rbac::RequireDealer`] -- `dealer` or `admin`.
//! - [`rbac::RequireAdmin`] -- `admin` only.

pub mod auth;
pub mod rbac;
