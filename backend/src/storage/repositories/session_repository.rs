use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::{format_timestamp, parse_timestamp};
use crate::domain::models::Session;
use crate::storage::connection::DbConnection;
use crate::storage::traits::SessionStorage;

/// Repository for login sessions
#[derive(Clone)]
pub struct SessionRepository {
    db: DbConnection,
}

impl SessionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStorage for SessionRepository {
    async fn store_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_key, driver_id, visits, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&session.key)
        .bind(session.driver_id)
        .bind(session.visits)
        .bind(format_timestamp(&session.expires_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_session(&self, key: &str) -> Result<Option<Session>> {
        let row = sqlx::query(
            r#"
            SELECT session_key, driver_id, visits, expires_at
            FROM sessions
            WHERE session_key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => {
                let expires_at: String = r.try_get("expires_at")?;
                Ok(Some(Session {
                    key: r.try_get("session_key")?,
                    driver_id: r.try_get("driver_id")?,
                    visits: r.try_get("visits")?,
                    expires_at: parse_timestamp(&expires_at)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn increment_visits(&self, key: &str) -> Result<Option<i64>> {
        let row = sqlx::query(
            r#"
            UPDATE sessions
            SET visits = visits + 1
            WHERE session_key = ?
            RETURNING visits
            "#,
        )
        .bind(key)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_get("visits")?)),
            None => Ok(None),
        }
    }

    async fn delete_session(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE session_key = ?")
            .bind(key)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        // Stored timestamps share one fixed-width UTC format, so they compare as text
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(format_timestamp(&now))
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
