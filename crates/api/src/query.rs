//! Query parameter types shared by several handler modules.

use serde::Deserialize;
use souq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};

/// `?limit=&offset=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` pair.
    pub fn window(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// `?token=` on the WebSocket upgrade, since browsers cannot set headers
/// on a WebSocket handshake.
#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}
