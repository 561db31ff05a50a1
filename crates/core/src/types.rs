//! Primitive aliases shared by every layer.

/// Primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Timestamps are stored and compared in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Optimistic concurrency counter carried on mutable status rows.
///
/// Every status transition bumps it by one; writers pass the version they
/// read and the update only applies if it still matches.
pub type RowVersion = i32;
