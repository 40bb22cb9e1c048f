pub mod database;
pub mod repositories;
pub mod unit_of_work;

pub use database::Database;
pub use repositories::SqliteTradingResultRepository;
pub use unit_of_work::SqliteTradingResultsUnitOfWork;

use crate::domain::errors::{RepositoryError, StoreError};

pub(crate) fn store_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Store(StoreError::Database {
        reason: e.to_string(),
    })
}
