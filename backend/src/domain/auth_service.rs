use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::auth::LoginCommand;
use super::errors::{ServiceError, ServiceResult};
use super::models::{Driver, Session};
use super::password::{verify_password, PasswordHasher};
use super::validation::{FormErrors, NON_FIELD_ERRORS};
use crate::storage::{DriverStorage, SessionStorage};

pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Service for logging drivers in and resolving their sessions
#[derive(Clone)]
pub struct AuthService {
    drivers: Arc<dyn DriverStorage>,
    sessions: Arc<dyn SessionStorage>,
    session_ttl: Duration,
    /// Checked for unknown usernames so they cost as much as a wrong password
    unusable_hash: String,
}

impl AuthService {
    pub fn new(
        drivers: Arc<dyn DriverStorage>,
        sessions: Arc<dyn SessionStorage>,
        session_ttl: Duration,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            drivers,
            sessions,
            session_ttl,
            unusable_hash: hasher.unusable_hash(),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Check the credentials and open a new session for the driver
    pub async fn login(&self, command: LoginCommand) -> ServiceResult<(Session, Driver)> {
        info!("Login attempt: username={}", command.username);

        let now = Utc::now();
        let purged = self.sessions.purge_expired(now).await?;
        if purged > 0 {
            info!("Purged {} expired sessions", purged);
        }

        let mut errors = FormErrors::new();
        let username = command.username.trim();
        errors.require("username", username);
        errors.require_unstripped("password", &command.password);
        errors.into_result()?;

        let candidate = self.drivers.get_driver_by_username(username).await?;
        let encoded = match &candidate {
            Some(driver) => driver.password_hash.clone(),
            None => self.unusable_hash.clone(),
        };
        let verified = Self::verify(encoded, &command.password).await?;
        let driver = match candidate {
            Some(driver) if verified => driver,
            _ => {
                warn!("Rejected login for username: {}", username);
                let mut errors = FormErrors::new();
                errors.add(NON_FIELD_ERRORS, INVALID_LOGIN_MESSAGE);
                return Err(ServiceError::Validation(errors));
            }
        };

        self.drivers.record_login(driver.id, now).await?;
        let session = Session {
            key: Session::generate_key(),
            driver_id: driver.id,
            visits: 0,
            expires_at: now + self.session_ttl,
        };
        self.sessions.store_session(&session).await?;

        info!("Driver {} logged in", driver.username);
        Ok((
            session,
            Driver {
                last_login: Some(now),
                ..driver
            },
        ))
    }

    /// Resolve a session key to its live session and driver.
    /// Expired sessions are deleted on sight.
    pub async fn authenticate(&self, key: &str) -> ServiceResult<Option<(Session, Driver)>> {
        let Some(session) = self.sessions.get_session(key).await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            info!("Session for driver {} expired", session.driver_id);
            self.sessions.delete_session(key).await?;
            return Ok(None);
        }

        match self.drivers.get_driver(session.driver_id).await? {
            Some(driver) => Ok(Some((session, driver))),
            None => {
                warn!("Session refers to missing driver: {}", session.driver_id);
                self.sessions.delete_session(key).await?;
                Ok(None)
            }
        }
    }

    pub async fn logout(&self, key: &str) -> ServiceResult<()> {
        self.sessions.delete_session(key).await?;
        info!("Session closed");
        Ok(())
    }

    async fn verify(encoded: String, raw_password: &str) -> ServiceResult<bool> {
        let raw_password = raw_password.to_string();
        let valid = tokio::task::spawn_blocking(move || verify_password(&raw_password, &encoded))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(valid)
    }
}
