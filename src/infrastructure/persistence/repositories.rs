use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::store_err;
use crate::domain::errors::{ParameterError, RepositoryError, StoreError};
use crate::domain::models::TradingResult;
use crate::domain::query::{self, ListQuery};
use crate::domain::repositories::AsyncTradingResultRepository;

/// Concurrent repository strategy over the SQLite pool.
///
/// Reads always hit the committed table; `add`/`add_bulk` only stage into
/// the owning unit of work's working set, which the unit of work flushes
/// in one transaction on commit. Rows are read back in `rowid` order so
/// the shared query composition sees the same stable insertion order the
/// in-memory strategy iterates in.
pub struct SqliteTradingResultRepository {
    pool: SqlitePool,
    staged: Vec<TradingResult>,
}

impl SqliteTradingResultRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            staged: Vec::new(),
        }
    }

    pub(crate) fn into_parts(self) -> (SqlitePool, Vec<TradingResult>) {
        (self.pool, self.staged)
    }
}

#[async_trait]
impl AsyncTradingResultRepository for SqliteTradingResultRepository {
    async fn get(&self, id: Uuid) -> Result<Option<TradingResult>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM trading_results WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        row.map(|row| map_row(&row)).transpose()
    }

    fn add(&mut self, result: TradingResult) -> Result<TradingResult, RepositoryError> {
        if result.id.is_some() {
            return Err(ParameterError::PresetId.into());
        }

        let record = TradingResult {
            id: Some(Uuid::new_v4()),
            ..result
        };
        self.staged.push(record.clone());
        Ok(record)
    }

    fn add_bulk(
        &mut self,
        results: Vec<TradingResult>,
    ) -> Result<Vec<TradingResult>, RepositoryError> {
        // All-or-nothing: check the whole batch before staging any of it
        if results.iter().any(|r| r.id.is_some()) {
            return Err(ParameterError::PresetId.into());
        }

        results.into_iter().map(|r| self.add(r)).collect()
    }

    async fn list(&self, list_query: &ListQuery) -> Result<Vec<TradingResult>, RepositoryError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM trading_results WHERE 1 = 1");

        if let Some(filter) = &list_query.filter {
            if let Some(oil_id) = &filter.oil_id {
                builder.push(" AND oil_id = ").push_bind(oil_id.clone());
            }
            if let Some(delivery_type_id) = &filter.delivery_type_id {
                builder
                    .push(" AND delivery_type_id = ")
                    .push_bind(delivery_type_id.clone());
            }
            if let Some(delivery_basis_id) = &filter.delivery_basis_id {
                builder
                    .push(" AND delivery_basis_id = ")
                    .push_bind(delivery_basis_id.clone());
            }
            if let Some(start_date) = filter.start_date {
                builder.push(" AND date >= ").push_bind(start_date);
            }
            if let Some(end_date) = filter.end_date {
                builder.push(" AND date <= ").push_bind(end_date);
            }
        }

        builder.push(" ORDER BY rowid");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;

        let records = rows
            .iter()
            .map(map_row)
            .collect::<Result<Vec<_>, _>>()?;

        // The filter already ran in SQL; distinct/order/limit go through
        // the composition shared with the blocking strategy
        let remainder = ListQuery {
            filter: None,
            ..list_query.clone()
        };
        Ok(query::apply(records, &remainder))
    }
}

fn map_row(row: &SqliteRow) -> Result<TradingResult, RepositoryError> {
    let id: String = row.try_get("id").map_err(store_err)?;
    let id = Uuid::parse_str(&id).map_err(|e| StoreError::Database {
        reason: format!("Malformed record id {id:?}: {e}"),
    })?;

    Ok(TradingResult {
        id: Some(id),
        exchange_product_id: row.try_get("exchange_product_id").map_err(store_err)?,
        exchange_product_name: row.try_get("exchange_product_name").map_err(store_err)?,
        oil_id: row.try_get("oil_id").map_err(store_err)?,
        delivery_basis_id: row.try_get("delivery_basis_id").map_err(store_err)?,
        delivery_basis_name: row.try_get("delivery_basis_name").map_err(store_err)?,
        delivery_type_id: row.try_get("delivery_type_id").map_err(store_err)?,
        volume: row.try_get("volume").map_err(store_err)?,
        total: row.try_get("total").map_err(store_err)?,
        count: row.try_get("count").map_err(store_err)?,
        date: row.try_get("date").map_err(store_err)?,
        created_on: row.try_get("created_on").map_err(store_err)?,
        updated_on: row.try_get("updated_on").map_err(store_err)?,
    })
}
