//! Response envelopes.
//!
//! Every JSON body is wrapped as `{ "data": ... }`. Paginated public
//! listings also carry the total row count and the page window actually
//! applied.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "total", "limit", "offset" }`.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
