use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of an exchange trading report, normalized.
///
/// `oil_id`, `delivery_basis_id` and `delivery_type_id` are never supplied
/// independently; they are sliced out of `exchange_product_id` by the row
/// mapper and stay consistent with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingResult {
    /// Assigned by the store on insertion. `None` until committed.
    pub id: Option<Uuid>,
    pub exchange_product_id: String,
    pub exchange_product_name: String,
    pub oil_id: String,
    pub delivery_basis_id: String,
    pub delivery_basis_name: String,
    pub delivery_type_id: String,
    pub volume: i64,
    pub total: i64,
    /// Number of executed contracts. Rows without one never reach this type.
    pub count: i64,
    /// Trading day, taken from the report file name.
    pub date: NaiveDate,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}
