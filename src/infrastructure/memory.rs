//! In-memory store and the blocking repository execution strategy.
//!
//! The committed record set lives behind an `Arc<RwLock>` shared by every
//! unit of work cloned from the same [`MemoryStore`]; each unit of work
//! stages its own working set and publishes it in one write-lock mutation
//! on commit. Insertion order of the shared vector is the stable iteration
//! order the query composition relies on.
//!
//! Suitable for single-process deployments and as the test double for the
//! SQLite strategy; `tests/repository_contract.rs` holds the two to the
//! same behavior.

use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::domain::errors::{ParameterError, RepositoryError, StoreError};
use crate::domain::models::TradingResult;
use crate::domain::query::{self, ListQuery};
use crate::domain::repositories::TradingResultRepository;

/// Handle to one shared committed record set.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<TradingResult>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Result<Vec<TradingResult>, StoreError> {
        Ok(self
            .records
            .read()
            .map_err(|e| StoreError::Database {
                reason: e.to_string(),
            })?
            .clone())
    }

    fn publish(&self, staged: Vec<TradingResult>) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|e| StoreError::Database {
                reason: e.to_string(),
            })?
            .extend(staged);
        Ok(())
    }
}

pub struct MemoryTradingResultRepository {
    store: MemoryStore,
    staged: Vec<TradingResult>,
}

impl MemoryTradingResultRepository {
    fn new(store: MemoryStore) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }
}

impl TradingResultRepository for MemoryTradingResultRepository {
    fn get(&self, id: Uuid) -> Result<Option<TradingResult>, RepositoryError> {
        let committed = self.store.snapshot()?;
        Ok(committed.into_iter().find(|r| r.id == Some(id)))
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

    fn list(&self, list_query: &ListQuery) -> Result<Vec<TradingResult>, RepositoryError> {
        let committed = self.store.snapshot()?;
        Ok(query::apply(committed, list_query))
    }
}

/// Blocking unit of work over a [`MemoryStore`].
///
/// Dropping it without calling [`commit`](Self::commit) discards the
/// staged working set, same as an explicit rollback.
pub struct MemoryTradingResultsUnitOfWork {
    repo: MemoryTradingResultRepository,
}

impl MemoryTradingResultsUnitOfWork {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            repo: MemoryTradingResultRepository::new(store),
        }
    }

    pub fn data(&self) -> &MemoryTradingResultRepository {
        &self.repo
    }

    pub fn data_mut(&mut self) -> &mut MemoryTradingResultRepository {
        &mut self.repo
    }

    /// Publishes the staged working set atomically.
    pub fn commit(self) -> Result<(), RepositoryError> {
        let MemoryTradingResultRepository { store, staged } = self.repo;
        store.publish(staged)?;
        Ok(())
    }

    /// Discards the staged working set.
    pub fn rollback(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn sample(code: &str) -> TradingResult {
        let now = Utc::now();
        TradingResult {
            id: None,
            exchange_product_id: code.to_string(),
            exchange_product_name: "Regular gasoline".to_string(),
            oil_id: code[..4].to_string(),
            delivery_basis_id: code[4..7].to_string(),
            delivery_basis_name: "Terminal".to_string(),
            delivery_type_id: code[code.len() - 1..].to_string(),
            volume: 100,
            total: 5_000_000,
            count: 4,
            date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            created_on: now,
            updated_on: now,
        }
    }

    #[test]
    fn test_add_assigns_an_id() {
        let store = MemoryStore::new();
        let mut uow = MemoryTradingResultsUnitOfWork::new(store);

        let added = uow.data_mut().add(sample("A100NVY060F")).unwrap();
        assert!(added.id.is_some());
    }

    #[test]
    fn test_staged_records_are_invisible_until_commit() {
        let store = MemoryStore::new();
        let mut uow = MemoryTradingResultsUnitOfWork::new(store.clone());

        uow.data_mut().add(sample("A100NVY060F")).unwrap();
        assert!(uow.data().list(&ListQuery::new()).unwrap().is_empty());

        uow.commit().unwrap();

        let uow = MemoryTradingResultsUnitOfWork::new(store);
        assert_eq!(uow.data().list(&ListQuery::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_rollback_discards_staged_records() {
        let store = MemoryStore::new();
        let mut uow = MemoryTradingResultsUnitOfWork::new(store.clone());

        uow.data_mut().add(sample("A100NVY060F")).unwrap();
        uow.rollback();

        let uow = MemoryTradingResultsUnitOfWork::new(store);
        assert!(uow.data().list(&ListQuery::new()).unwrap().is_empty());
    }

    #[test]
    fn test_units_of_work_stage_independently() {
        let store = MemoryStore::new();
        let mut first = MemoryTradingResultsUnitOfWork::new(store.clone());
        let mut second = MemoryTradingResultsUnitOfWork::new(store.clone());

        first.data_mut().add(sample("A100NVY060F")).unwrap();
        second.data_mut().add(sample("A200ABS060F")).unwrap();

        first.commit().unwrap();
        second.rollback();

        let uow = MemoryTradingResultsUnitOfWork::new(store);
        let committed = uow.data().list(&ListQuery::new()).unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].exchange_product_id, "A100NVY060F");
    }
}
