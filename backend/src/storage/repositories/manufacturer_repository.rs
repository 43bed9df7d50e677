use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::domain::models::{Manufacturer, NewManufacturer};
use crate::domain::search::SearchTerm;
use crate::storage::connection::DbConnection;
use crate::storage::traits::ManufacturerStorage;

/// Repository for manufacturer operations
#[derive(Clone)]
pub struct ManufacturerRepository {
    db: DbConnection,
}

impl ManufacturerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Manufacturer> {
        Ok(Manufacturer {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            country: row.try_get("country")?,
        })
    }
}

#[async_trait]
impl ManufacturerStorage for ManufacturerRepository {
    async fn store_manufacturer(&self, manufacturer: &NewManufacturer) -> Result<Manufacturer> {
        let result = sqlx::query(
            r#"
            INSERT INTO manufacturers (name, country)
            VALUES (?, ?)
            "#,
        )
        .bind(&manufacturer.name)
        .bind(&manufacturer.country)
        .execute(self.db.pool())
        .await?;

        Ok(Manufacturer {
            id: result.last_insert_rowid(),
            name: manufacturer.name.clone(),
            country: manufacturer.country.clone(),
        })
    }

    async fn get_manufacturer(&self, id: i64) -> Result<Option<Manufacturer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, country
            FROM manufacturers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_manufacturers(&self, filter: Option<&SearchTerm>) -> Result<Vec<Manufacturer>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, name, country FROM manufacturers");
        if let Some(term) = filter {
            query
                .push(" WHERE name LIKE ")
                .push_bind(term.like_pattern())
                .push(r" ESCAPE '\'");
        }
        query.push(" ORDER BY name ASC, id ASC");

        let rows = query.build().fetch_all(self.db.pool()).await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_manufacturer(&self, manufacturer: &Manufacturer) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE manufacturers
            SET name = ?, country = ?
            WHERE id = ?
            "#,
        )
        .bind(&manufacturer.name)
        .bind(&manufacturer.country)
        .bind(manufacturer.id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_manufacturer(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM manufacturers WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_manufacturers(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM manufacturers")
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.try_get("count")?)
    }
}
