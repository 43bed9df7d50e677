use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::password;

/// Domain model for a driver. Drivers are also the user accounts of the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub id: i64,
    pub username: String,
    /// Encoded password hash, see [`password::PasswordHasher`]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Driver {
    /// Check a raw password against the stored hash
    pub fn check_password(&self, raw_password: &str) -> bool {
        password::verify_password(raw_password, &self.password_hash)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.username, self.first_name, self.last_name)
    }
}

/// A driver that has not been stored yet. The password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDriver {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub date_joined: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::password::PasswordHasher;

    fn driver_with_password(raw_password: &str) -> Driver {
        Driver {
            id: 1,
            username: "dimka".to_string(),
            password_hash: PasswordHasher::new(1_000).hash(raw_password).unwrap(),
            first_name: "dmytro".to_string(),
            last_name: "samoylenko".to_string(),
            license_number: "ABC12345".to_string(),
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_driver_display() {
        let driver = driver_with_password("12345dimka");

        assert_eq!(driver.to_string(), "dimka (dmytro samoylenko)");
    }

    #[test]
    fn test_driver_check_password() {
        let driver = driver_with_password("12345dimka");

        assert!(driver.check_password("12345dimka"));
        assert!(!driver.check_password("12345Dimka"));
        assert!(!driver.check_password(""));
    }
}
