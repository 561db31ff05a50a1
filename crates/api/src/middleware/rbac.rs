//! Role guards over the marketplace's three roles.
//!
//! | Extractor       | Admits                           |
//! |-----------------|----------------------------------|
//! | `RequireAuth`   | `normal_user`, `dealer`, `admin` |
//! | `RequireDealer` | `dealer`, `admin`                |
//! | `RequireAdmin`  | `admin`                          |
//!
//! A missing or invalid token is rejected by [`AuthUser`] with 401; a role
//! outside the guard's set gets 403. Car and dealership ownership is checked
//! in the handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use souq_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! role_guard {
    ($(#[$doc:meta])* $name:ident, [$($role:expr),+ $(,)?], $denied:literal) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        impl $name {
            /// Roles this guard lets through.
            pub const ADMITS: &'static [Role] = &[$($role),+];
        }

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                if !Self::ADMITS.contains(&user.role) {
                    tracing::debug!(user_id = user.user_id, role = %user.role, "Role denied");
                    return Err(AppError::forbidden($denied));
                }
                Ok($name(user))
            }
        }
    };
}

role_guard!(
    /// Moderation: dealership and listing review, catalog, profiles, logs.
    RequireAdmin,
    [Role::Admin],
    "Admin role required"
);

role_guard!(
    /// Dealer-facing routes. Admins pass so they can inspect a dealer's view.
    RequireDealer,
    [Role::Dealer, Role::Admin],
    "Dealer role required"
);

role_guard!(
    /// Any signed-in profile, including a `normal_user` selling privately.
    RequireAuth,
    [Role::NormalUser, Role::Dealer, Role::Admin],
    "Sign-in required"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_users_reach_only_signed_in_routes() {
        assert!(RequireAuth::ADMITS.contains(&Role::NormalUser));
        assert!(!RequireDealer::ADMITS.contains(&Role::NormalUser));
        assert!(!RequireAdmin::ADMITS.contains(&Role::NormalUser));
    }

    #[test]
    fn dealers_are_not_admins() {
        assert!(RequireDealer::ADMITS.contains(&Role::Dealer));
        assert!(!RequireAdmin::ADMITS.contains(&Role::Dealer));
    }

    #[test]
    fn admins_pass_every_guard() {
        for admits in [RequireAuth::ADMITS, RequireDealer::ADMITS, RequireAdmin::ADMITS] {
            assert!(admits.contains(&Role::Admin));
        }
    }
}
