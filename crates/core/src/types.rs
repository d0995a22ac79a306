//! Shared scalar type aliases.

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC. Publication dates, rating timestamps, and row
/// audit columns all use this alias.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
