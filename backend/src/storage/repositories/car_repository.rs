use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, Transaction};
use std::collections::HashMap;

use super::driver_repository::{DriverRepository, DRIVER_COLUMNS};
use crate::domain::models::{Car, Driver, Manufacturer, NewCar};
use crate::domain::search::SearchTerm;
use crate::storage::connection::DbConnection;
use crate::storage::traits::CarStorage;

const CAR_SELECT: &str = "SELECT c.id, c.model, m.id AS manufacturer_id, \
     m.name AS manufacturer_name, m.country AS manufacturer_country \
     FROM cars c JOIN manufacturers m ON m.id = c.manufacturer_id";

/// Repository for car operations, including the car/driver link table
#[derive(Clone)]
pub struct CarRepository {
    db: DbConnection,
}

impl CarRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Map a row of [`CAR_SELECT`]. Drivers are attached separately
    fn from_row(row: &SqliteRow) -> Result<Car> {
        Ok(Car {
            id: row.try_get("id")?,
            model: row.try_get("model")?,
            manufacturer: Manufacturer {
                id: row.try_get("manufacturer_id")?,
                name: row.try_get("manufacturer_name")?,
                country: row.try_get("manufacturer_country")?,
            },
            drivers: Vec::new(),
        })
    }

    /// Load the driver sets of all given cars with one query
    async fn attach_drivers(&self, cars: &mut [Car]) -> Result<()> {
        if cars.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT cd.car_id, {} FROM car_drivers cd \
             JOIN drivers d ON d.id = cd.driver_id \
             WHERE cd.car_id IN (",
            DRIVER_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for car in cars.iter() {
            separated.push_bind(car.id);
        }
        separated.push_unseparated(") ORDER BY d.username ASC");

        let rows = query.build().fetch_all(self.db.pool()).await?;

        let mut drivers_by_car: HashMap<i64, Vec<Driver>> = HashMap::new();
        for row in &rows {
            let car_id: i64 = row.try_get("car_id")?;
            drivers_by_car
                .entry(car_id)
                .or_default()
                .push(DriverRepository::from_row(row)?);
        }

        for car in cars.iter_mut() {
            car.drivers = drivers_by_car.remove(&car.id).unwrap_or_default();
        }

        Ok(())
    }

    async fn fetch_cars(&self, mut query: QueryBuilder<'_, Sqlite>) -> Result<Vec<Car>> {
        let rows = query.build().fetch_all(self.db.pool()).await?;
        let mut cars = rows.iter().map(Self::from_row).collect::<Result<Vec<_>>>()?;
        self.attach_drivers(&mut cars).await?;
        Ok(cars)
    }

    async fn insert_drivers(
        tx: &mut Transaction<'_, Sqlite>,
        car_id: i64,
        driver_ids: &[i64],
    ) -> Result<()> {
        for driver_id in driver_ids {
            sqlx::query("INSERT OR IGNORE INTO car_drivers (car_id, driver_id) VALUES (?, ?)")
                .bind(car_id)
                .bind(driver_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CarStorage for CarRepository {
    async fn store_car(&self, car: &NewCar) -> Result<Car> {
        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query("INSERT INTO cars (model, manufacturer_id) VALUES (?, ?)")
            .bind(&car.model)
            .bind(car.manufacturer_id)
            .execute(&mut *tx)
            .await?;
        let car_id = result.last_insert_rowid();

        Self::insert_drivers(&mut tx, car_id, &car.driver_ids).await?;
        tx.commit().await?;

        self.get_car(car_id)
            .await?
            .ok_or_else(|| anyhow!("Car {} missing right after insert", car_id))
    }

    async fn get_car(&self, id: i64) -> Result<Option<Car>> {
        let mut query = QueryBuilder::<Sqlite>::new(CAR_SELECT);
        query.push(" WHERE c.id = ").push_bind(id);

        Ok(self.fetch_cars(query).await?.into_iter().next())
    }

    async fn list_cars(&self, filter: Option<&SearchTerm>) -> Result<Vec<Car>> {
        let mut query = QueryBuilder::<Sqlite>::new(CAR_SELECT);
        if let Some(term) = filter {
            query
                .push(" WHERE c.model LIKE ")
                .push_bind(term.like_pattern())
                .push(r" ESCAPE '\'");
        }
        query.push(" ORDER BY c.id ASC");

        self.fetch_cars(query).await
    }

    async fn list_cars_for_driver(&self, driver_id: i64) -> Result<Vec<Car>> {
        let mut query = QueryBuilder::<Sqlite>::new(CAR_SELECT);
        query
            .push(" WHERE c.id IN (SELECT car_id FROM car_drivers WHERE driver_id = ")
            .push_bind(driver_id)
            .push(") ORDER BY c.id ASC");

        self.fetch_cars(query).await
    }

    async fn update_car(&self, id: i64, car: &NewCar) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query("UPDATE cars SET model = ?, manufacturer_id = ? WHERE id = ?")
            .bind(&car.model)
            .bind(car.manufacturer_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM car_drivers WHERE car_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_drivers(&mut tx, id, &car.driver_ids).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_car(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cars WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_driver(&self, car_id: i64, driver_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO car_drivers (car_id, driver_id) VALUES (?, ?)")
            .bind(car_id)
            .bind(driver_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn remove_driver(&self, car_id: i64, driver_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM car_drivers WHERE car_id = ? AND driver_id = ?")
            .bind(car_id)
            .bind(driver_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn count_cars(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM cars")
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.try_get("count")?)
    }
}
