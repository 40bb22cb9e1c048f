use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Connection pool wrapper, built once at process start and passed into
/// every unit of work explicitly.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal); // Better for concurrency

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// A private in-memory database on a single pinned connection. Used by
    /// the integration tests; a multi-connection pool would hand every
    /// connection its own empty in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trading_results (
                id TEXT PRIMARY KEY,
                exchange_product_id TEXT NOT NULL,
                exchange_product_name TEXT NOT NULL,
                oil_id TEXT NOT NULL,
                delivery_basis_id TEXT NOT NULL,
                delivery_basis_name TEXT NOT NULL,
                delivery_type_id TEXT NOT NULL,
                volume INTEGER NOT NULL,
                total INTEGER NOT NULL,
                count INTEGER NOT NULL,
                date DATE NOT NULL,
                created_on DATETIME NOT NULL,
                updated_on DATETIME NOT NULL
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create trading_results table")?;

        // Indexes for the filter dimensions the query layer pushes into SQL
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_trading_results_oil
            ON trading_results (oil_id, delivery_type_id, delivery_basis_id);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create product index")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_trading_results_date
            ON trading_results (date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create date index")?;

        info!("Database schema initialized.");
        Ok(())
    }
}
