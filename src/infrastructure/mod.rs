pub mod extract;
pub mod fetch;
pub mod memory;
pub mod persistence;
pub mod sheet;

pub use memory::{MemoryStore, MemoryTradingResultsUnitOfWork};
pub use persistence::{Database, SqliteTradingResultsUnitOfWork};
