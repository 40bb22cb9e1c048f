//! Repository abstractions for stored trading results.
//!
//! One operation set, two execution strategies: a blocking trait for the
//! synchronous in-memory store and an async trait for the SQLite store.
//! Both stage `add`/`add_bulk` into the owning unit of work's working set;
//! staged records stay invisible to `get`/`list` until the unit of work
//! commits. The strategies must return identical results for identical
//! queries and committed state, which `tests/repository_contract.rs` pins.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::models::TradingResult;
use crate::domain::query::ListQuery;

/// Blocking execution strategy.
pub trait TradingResultRepository {
    /// Committed record with this id, or `None`. A missing id is not an
    /// error.
    fn get(&self, id: Uuid) -> Result<Option<TradingResult>, RepositoryError>;

    /// Assigns a fresh id and stages the record. Rejects records that
    /// already carry an id.
    fn add(&mut self, result: TradingResult) -> Result<TradingResult, RepositoryError>;

    /// Stages a batch under the same id rule; one preset id rejects the
    /// whole batch with nothing staged.
    fn add_bulk(
        &mut self,
        results: Vec<TradingResult>,
    ) -> Result<Vec<TradingResult>, RepositoryError>;

    /// Committed records matching `query`, composed per `domain::query`.
    fn list(&self, query: &ListQuery) -> Result<Vec<TradingResult>, RepositoryError>;
}

/// Concurrent execution strategy. `add`/`add_bulk` stay synchronous: they
/// only touch the staged working set, never the store.
#[async_trait]
pub trait AsyncTradingResultRepository: Send {
    async fn get(&self, id: Uuid) -> Result<Option<TradingResult>, RepositoryError>;

    fn add(&mut self, result: TradingResult) -> Result<TradingResult, RepositoryError>;

    fn add_bulk(
        &mut self,
        results: Vec<TradingResult>,
    ) -> Result<Vec<TradingResult>, RepositoryError>;

    async fn list(&self, query: &ListQuery) -> Result<Vec<TradingResult>, RepositoryError>;
}
