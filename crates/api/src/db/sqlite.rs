use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use std::{str::FromStr, time::Duration};
use time::Date;

use super::{DatedTobs, Error, TobsQuery, DATE_FORMAT};

/// Read-only access to the measurement and station tables. The tables are
/// created and populated by an external loading pipeline; this service never
/// writes to them.
#[async_trait]
pub trait ClimateData: Send + Sync {
    /// `(date, tobs)` pairs for observations on or after `start`, in store
    /// order (rowid, which matches insertion order).
    async fn observations_since(&self, start: Date) -> Result<Vec<DatedTobs>, Error>;
    /// Bare tobs values matching the bounds, duplicates preserved, store
    /// order.
    async fn temperature_readings(&self, query: &TobsQuery) -> Result<Vec<f64>, Error>;
    /// All station names, in store order.
    async fn station_names(&self) -> Result<Vec<String>, Error>;
}

pub struct ClimateDb {
    pool: SqlitePool,
}

impl ClimateDb {
    /// Open the sqlite file read-only and verify it responds to queries.
    pub async fn connect(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open sqlite database at {}", path))?;

        let db = Self { pool };
        db.health_check().await?;
        info!("sqlite database opened read-only at: {}", path);

        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check database connectivity and integrity.
    pub async fn health_check(&self) -> Result<()> {
        // Basic connectivity
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connectivity check failed")?;

        // Page structure integrity
        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await
            .context("Database integrity check failed")?;
        if result != "ok" {
            return Err(anyhow::anyhow!(
                "Database integrity check failed: {}",
                result
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl ClimateData for ClimateDb {
    async fn observations_since(&self, start: Date) -> Result<Vec<DatedTobs>, Error> {
        let rows = sqlx::query(
            "SELECT date, tobs FROM measurement
             WHERE date >= ?
             ORDER BY id",
        )
        .bind(start.format(&DATE_FORMAT)?)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| DatedTobs {
                date: row.get("date"),
                tobs: row.get("tobs"),
            })
            .collect())
    }

    async fn temperature_readings(&self, query: &TobsQuery) -> Result<Vec<f64>, Error> {
        let start = query.start.format(&DATE_FORMAT)?;

        let rows = match query.end {
            Some(end) => {
                sqlx::query(
                    "SELECT tobs FROM measurement
                     WHERE date >= ? AND date <= ?
                     ORDER BY id",
                )
                .bind(start)
                .bind(end.format(&DATE_FORMAT)?)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT tobs FROM measurement
                     WHERE date >= ?
                     ORDER BY id",
                )
                .bind(start)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(|row| row.get("tobs")).collect())
    }

    async fn station_names(&self) -> Result<Vec<String>, Error> {
        let rows = sqlx::query("SELECT name FROM station ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("name")).collect())
    }
}
