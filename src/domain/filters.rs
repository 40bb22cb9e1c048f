use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::models::TradingResult;

/// Optional predicates over stored trading results.
///
/// Every present field constrains the result set; absent fields do not.
/// Present predicates are ANDed together, so `Default` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingResultFilter {
    pub oil_id: Option<String>,
    pub delivery_type_id: Option<String>,
    pub delivery_basis_id: Option<String>,
    /// Inclusive lower bound on `date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub end_date: Option<NaiveDate>,
}

impl TradingResultFilter {
    pub fn matches(&self, result: &TradingResult) -> bool {
        if let Some(oil_id) = &self.oil_id
            && result.oil_id != *oil_id
        {
            return false;
        }

        if let Some(delivery_type_id) = &self.delivery_type_id
            && result.delivery_type_id != *delivery_type_id
        {
            return false;
        }

        if let Some(delivery_basis_id) = &self.delivery_basis_id
            && result.delivery_basis_id != *delivery_basis_id
        {
            return false;
        }

        if let Some(start_date) = self.start_date
            && result.date < start_date
        {
            return false;
        }

        if let Some(end_date) = self.end_date
            && result.date > end_date
        {
            return false;
        }

        true
    }
}
