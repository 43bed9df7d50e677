use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

/// DbConnection manages the SQLite connection pool and schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database file if needed
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().simple().to_string();
        let db_url = format!("sqlite:file:memdb_{}?mode=memory&cache=shared", test_id);

        let options = SqliteConnectOptions::from_str(&db_url)?.foreign_keys(true);

        // A single long-lived connection keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS manufacturers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                country TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for ordering and searching manufacturers by name
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_manufacturers_name
            ON manufacturers(name);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drivers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                license_number TEXT NOT NULL,
                date_joined TEXT NOT NULL,
                last_login TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cars (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                model TEXT NOT NULL,
                manufacturer_id INTEGER NOT NULL,
                FOREIGN KEY (manufacturer_id) REFERENCES manufacturers (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for the manufacturer foreign key
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_cars_manufacturer_id
            ON cars(manufacturer_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Many-to-many link between cars and drivers
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS car_drivers (
                car_id INTEGER NOT NULL,
                driver_id INTEGER NOT NULL,
                PRIMARY KEY (car_id, driver_id),
                FOREIGN KEY (car_id) REFERENCES cars (id) ON DELETE CASCADE,
                FOREIGN KEY (driver_id) REFERENCES drivers (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_car_drivers_driver_id
            ON car_drivers(driver_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                session_key TEXT PRIMARY KEY,
                driver_id INTEGER NOT NULL,
                visits INTEGER NOT NULL DEFAULT 0,
                expires_at TEXT NOT NULL,
                FOREIGN KEY (driver_id) REFERENCES drivers (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
