/// Identity of the signed-in user, as returned by the session lookup.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
