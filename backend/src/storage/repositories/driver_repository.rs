use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashSet;

use super::{format_timestamp, parse_timestamp};
use crate::domain::models::{Driver, NewDriver};
use crate::domain::search::SearchTerm;
use crate::storage::connection::DbConnection;
use crate::storage::traits::{DriverStorage, UsernameTaken};

/// Columns selected for every driver query, prefixed with the `d` table alias
pub(crate) const DRIVER_COLUMNS: &str = "d.id, d.username, d.password, d.first_name, \
     d.last_name, d.license_number, d.date_joined, d.last_login";

/// Repository for driver operations
#[derive(Clone)]
pub struct DriverRepository {
    db: DbConnection,
}

impl DriverRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub(crate) fn from_row(row: &SqliteRow) -> Result<Driver> {
        let date_joined: String = row.try_get("date_joined")?;
        let last_login: Option<String> = row.try_get("last_login")?;

        Ok(Driver {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            license_number: row.try_get("license_number")?,
            date_joined: parse_timestamp(&date_joined)?,
            last_login: last_login.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

#[async_trait]
impl DriverStorage for DriverRepository {
    async fn store_driver(&self, driver: &NewDriver) -> Result<Driver> {
        let result = sqlx::query(
            r#"
            INSERT INTO drivers (username, password, first_name, last_name, license_number, date_joined)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&driver.username)
        .bind(&driver.password_hash)
        .bind(&driver.first_name)
        .bind(&driver.last_name)
        .bind(&driver.license_number)
        .bind(format_timestamp(&driver.date_joined))
        .execute(self.db.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                anyhow::Error::new(UsernameTaken(driver.username.clone()))
            }
            other => other.into(),
        })?;

        Ok(Driver {
            id: result.last_insert_rowid(),
            username: driver.username.clone(),
            password_hash: driver.password_hash.clone(),
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            license_number: driver.license_number.clone(),
            date_joined: driver.date_joined,
            last_login: None,
        })
    }

    async fn get_driver(&self, id: i64) -> Result<Option<Driver>> {
        let sql = format!("SELECT {} FROM drivers d WHERE d.id = ?", DRIVER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn get_driver_by_username(&self, username: &str) -> Result<Option<Driver>> {
        let sql = format!("SELECT {} FROM drivers d WHERE d.username = ?", DRIVER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_missing_driver_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM drivers WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = query.build().fetch_all(self.db.pool()).await?;
        let existing = rows
            .iter()
            .map(|row| row.try_get::<i64, _>("id"))
            .collect::<Result<HashSet<_>, _>>()?;

        let mut reported = HashSet::new();
        let missing = ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id) && reported.insert(*id))
            .collect();
        Ok(missing)
    }

    async fn list_drivers(&self, filter: Option<&SearchTerm>) -> Result<Vec<Driver>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM drivers d", DRIVER_COLUMNS));
        if let Some(term) = filter {
            query
                .push(" WHERE d.username LIKE ")
                .push_bind(term.like_pattern())
                .push(r" ESCAPE '\'");
        }
        query.push(" ORDER BY d.username ASC");

        let rows = query.build().fetch_all(self.db.pool()).await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_license_number(&self, id: i64, license_number: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE drivers SET license_number = ? WHERE id = ?")
            .bind(license_number)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE drivers SET last_login = ? WHERE id = ?")
            .bind(format_timestamp(&at))
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn delete_driver(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_drivers(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM drivers")
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.try_get("count")?)
    }
}
