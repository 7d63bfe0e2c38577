/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// External identity-provider user id (e.g. `user_2abc...`).
pub type ClerkId = String;
