use chrono::{DateTime, Utc};

/// An authenticated browser session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque random key carried in the session cookie
    pub key: String,
    pub driver_id: i64,
    /// Number of home page visits within this session
    pub visits: i64,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn generate_key() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
