use tracing::debug;

use super::database::Database;
use super::repositories::SqliteTradingResultRepository;
use super::store_err;
use crate::domain::errors::RepositoryError;

/// Concurrent unit of work: one isolated staged working set over the
/// shared SQLite pool.
///
/// Constructed from an explicit [`Database`] handle; every in-flight
/// ingestion owns its own unit of work, so concurrent units never share
/// mutable state. Dropping without [`commit`](Self::commit) discards the
/// staged records, same as an explicit rollback.
pub struct SqliteTradingResultsUnitOfWork {
    repo: SqliteTradingResultRepository,
}

impl SqliteTradingResultsUnitOfWork {
    pub fn new(database: &Database) -> Self {
        Self {
            repo: SqliteTradingResultRepository::new(database.pool.clone()),
        }
    }

    pub fn data(&self) -> &SqliteTradingResultRepository {
        &self.repo
    }

    pub fn data_mut(&mut self) -> &mut SqliteTradingResultRepository {
        &mut self.repo
    }

    /// Inserts the staged working set inside one transaction. Either
    /// every staged record becomes visible or none does.
    pub async fn commit(self) -> Result<(), RepositoryError> {
        let (pool, staged) = self.repo.into_parts();
        if staged.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await.map_err(store_err)?;

        for record in &staged {
            sqlx::query(
                r#"
                INSERT INTO trading_results (
                    id, exchange_product_id, exchange_product_name,
                    oil_id, delivery_basis_id, delivery_basis_name, delivery_type_id,
                    volume, total, count, date, created_on, updated_on
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.id.map(|id| id.to_string()))
            .bind(&record.exchange_product_id)
            .bind(&record.exchange_product_name)
            .bind(&record.oil_id)
            .bind(&record.delivery_basis_id)
            .bind(&record.delivery_basis_name)
            .bind(&record.delivery_type_id)
            .bind(record.volume)
            .bind(record.total)
            .bind(record.count)
            .bind(record.date)
            .bind(record.created_on)
            .bind(record.updated_on)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;
        }

        tx.commit().await.map_err(store_err)?;

        debug!("Committed {} trading results", staged.len());
        Ok(())
    }

    /// Discards the staged working set.
    pub fn rollback(self) {
        drop(self);
    }
}
