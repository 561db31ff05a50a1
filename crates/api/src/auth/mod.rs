//! Bearer-token verification.
//!
//! Sign-in happens at the external auth provider, which issues HS256 tokens
//! signed with the secret this server shares. [`jwt`] only validates them.

pub mod jwt;
