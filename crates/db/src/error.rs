//! Error type for repository workflows that enforce domain rules inside a
//! transaction.

use souq_core::error::CoreError;

/// Either the database failed or a domain rule rejected the write.
///
/// Returning early with `Domain` drops the open transaction, which rolls it
/// back.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Domain(#[from] CoreError),
}
