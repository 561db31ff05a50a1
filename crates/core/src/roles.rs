//! Profile roles.
//!
//! These must match the `chk_profiles_role` constraint in
//! `20260301000002_create_profiles.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_NORMAL_USER: &str = "normal_user";
pub const ROLE_DEALER: &str = "dealer";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_NORMAL_USER, ROLE_DEALER, ROLE_ADMIN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    NormalUser,
    Dealer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::NormalUser => ROLE_NORMAL_USER,
            Role::Dealer => ROLE_DEALER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_NORMAL_USER => Ok(Role::NormalUser),
            ROLE_DEALER => Ok(Role::Dealer),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}
