/// Job identifiers are UUID v4 strings, opaque to callers.
pub type JobId = String;

/// Session identifiers are UUID v4 strings, opaque to callers.
pub type SessionId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh identifier for a job or session.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
