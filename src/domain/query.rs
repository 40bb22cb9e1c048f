//! Query composition shared by every repository execution strategy.
//!
//! Both the blocking and the concurrent repository run their result sets
//! through [`apply`], so filter, distinct-on, ordering and limit behave
//! identically no matter which strategy executes a query. The fixed order
//! of application is filter, then distinct_on, then order_by, then limit;
//! distinct keeps the first occurrence in the store's insertion order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::errors::ParameterError;
use crate::domain::filters::TradingResultFilter;
use crate::domain::models::TradingResult;

/// A sortable/groupable attribute of [`TradingResult`].
///
/// `FromStr` accepts the exact snake_case attribute names the record
/// exposes (`"date"`, `"oil_id"`, ...) and rejects anything else, so a
/// misspelled field name from a caller fails fast instead of silently
/// matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    ExchangeProductId,
    ExchangeProductName,
    OilId,
    DeliveryBasisId,
    DeliveryBasisName,
    DeliveryTypeId,
    Volume,
    Total,
    Count,
    Date,
    CreatedOn,
    UpdatedOn,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::ExchangeProductId => "exchange_product_id",
            Field::ExchangeProductName => "exchange_product_name",
            Field::OilId => "oil_id",
            Field::DeliveryBasisId => "delivery_basis_id",
            Field::DeliveryBasisName => "delivery_basis_name",
            Field::DeliveryTypeId => "delivery_type_id",
            Field::Volume => "volume",
            Field::Total => "total",
            Field::Count => "count",
            Field::Date => "date",
            Field::CreatedOn => "created_on",
            Field::UpdatedOn => "updated_on",
        }
    }

    /// The value this field takes on a given record, as a comparable key.
    pub fn value_of(&self, result: &TradingResult) -> FieldValue {
        match self {
            Field::Id => FieldValue::Id(result.id),
            Field::ExchangeProductId => FieldValue::Text(result.exchange_product_id.clone()),
            Field::ExchangeProductName => FieldValue::Text(result.exchange_product_name.clone()),
            Field::OilId => FieldValue::Text(result.oil_id.clone()),
            Field::DeliveryBasisId => FieldValue::Text(result.delivery_basis_id.clone()),
            Field::DeliveryBasisName => FieldValue::Text(result.delivery_basis_name.clone()),
            Field::DeliveryTypeId => FieldValue::Text(result.delivery_type_id.clone()),
            Field::Volume => FieldValue::Int(result.volume),
            Field::Total => FieldValue::Int(result.total),
            Field::Count => FieldValue::Int(result.count),
            Field::Date => FieldValue::Date(result.date),
            Field::CreatedOn => FieldValue::Timestamp(result.created_on),
            Field::UpdatedOn => FieldValue::Timestamp(result.updated_on),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Field::Id),
            "exchange_product_id" => Ok(Field::ExchangeProductId),
            "exchange_product_name" => Ok(Field::ExchangeProductName),
            "oil_id" => Ok(Field::OilId),
            "delivery_basis_id" => Ok(Field::DeliveryBasisId),
            "delivery_basis_name" => Ok(Field::DeliveryBasisName),
            "delivery_type_id" => Ok(Field::DeliveryTypeId),
            "volume" => Ok(Field::Volume),
            "total" => Ok(Field::Total),
            "count" => Ok(Field::Count),
            "date" => Ok(Field::Date),
            "created_on" => Ok(Field::CreatedOn),
            "updated_on" => Ok(Field::UpdatedOn),
            _ => Err(ParameterError::UnknownField {
                name: s.to_string(),
            }),
        }
    }
}

/// One field's value, detached from its record. Variants never mix for a
/// given field, so the derived ordering is only ever exercised within one
/// variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    Id(Option<Uuid>),
    Text(String),
    Int(i64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

/// Declarative description of one `list` call.
///
/// Built fluently and passed to a repository by value:
///
/// ```
/// use spimex_reports::domain::query::{Field, ListQuery};
///
/// let query = ListQuery::new()
///     .order_by(Field::Date)
///     .descending()
///     .distinct_on(Field::Date)
///     .limit(10);
/// # let _ = query;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: Option<TradingResultFilter>,
    pub distinct_on: Option<Field>,
    pub order_by: Option<Field>,
    pub ascending: bool,
    pub limit: Option<usize>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: None,
            distinct_on: None,
            order_by: None,
            ascending: true,
            limit: None,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: TradingResultFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn distinct_on(mut self, field: Field) -> Self {
        self.distinct_on = Some(field);
        self
    }

    pub fn order_by(mut self, field: Field) -> Self {
        self.order_by = Some(field);
        self
    }

    pub fn ascending(mut self) -> Self {
        self.ascending = true;
        self
    }

    pub fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// String-boundary variant of [`ListQuery::distinct_on`] for callers
    /// that hold an attribute name rather than a [`Field`].
    pub fn distinct_on_name(self, name: &str) -> Result<Self, ParameterError> {
        Ok(self.distinct_on(Field::from_str(name)?))
    }

    /// String-boundary variant of [`ListQuery::order_by`].
    pub fn order_by_name(self, name: &str) -> Result<Self, ParameterError> {
        Ok(self.order_by(Field::from_str(name)?))
    }
}

/// Runs a committed record set through a query's distinct/order/limit
/// steps, plus its filter when one is present.
///
/// `records` must arrive in the store's stable insertion order; distinct
/// keeps the first occurrence per key relative to that order, ordering is
/// a stable sort on the selected field (ties keep input order), and limit
/// truncates last.
pub fn apply(records: Vec<TradingResult>, query: &ListQuery) -> Vec<TradingResult> {
    let mut records = records;

    if let Some(filter) = &query.filter {
        records.retain(|result| filter.matches(result));
    }

    if let Some(field) = query.distinct_on {
        records = distinct_records(records, field);
    }

    if let Some(field) = query.order_by {
        order_records(&mut records, field, query.ascending);
    }

    if let Some(limit) = query.limit {
        records.truncate(limit);
    }

    records
}

/// Keeps the first-encountered record per distinct value of `field`.
pub fn distinct_records(records: Vec<TradingResult>, field: Field) -> Vec<TradingResult> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|result| seen.insert(field.value_of(result)))
        .collect()
}

/// Stable sort on `field`; descending reverses the key comparison only,
/// so equal keys still keep their input order.
pub fn order_records(records: &mut [TradingResult], field: Field, ascending: bool) {
    if ascending {
        records.sort_by(|a, b| field.value_of(a).cmp(&field.value_of(b)));
    } else {
        records.sort_by(|a, b| field.value_of(b).cmp(&field.value_of(a)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn result(oil_id: &str, date: NaiveDate, volume: i64) -> TradingResult {
        let now = Utc::now();
        TradingResult {
            id: None,
            exchange_product_id: format!("{oil_id}NVY060F"),
            exchange_product_name: "Test product".to_string(),
            oil_id: oil_id.to_string(),
            delivery_basis_id: "NVY".to_string(),
            delivery_basis_name: "Test basis".to_string(),
            delivery_type_id: "F".to_string(),
            volume,
            total: volume * 100,
            count: 1,
            date,
            created_on: now,
            updated_on: now,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn test_field_round_trips_through_names() {
        for field in [Field::Date, Field::OilId, Field::Volume, Field::CreatedOn] {
            assert_eq!(Field::from_str(field.as_str()).unwrap(), field);
        }
    }

    #[test]
    fn test_unknown_field_name_is_rejected() {
        let err = Field::from_str("oil").unwrap_err();
        assert!(matches!(err, ParameterError::UnknownField { .. }));
    }

    #[test]
    fn test_filter_keeps_only_matching_records() {
        let records = vec![
            result("A100", day(1), 10),
            result("A200", day(2), 20),
            result("A100", day(3), 30),
        ];
        let query = ListQuery::new().filter(TradingResultFilter {
            oil_id: Some("A100".to_string()),
            ..Default::default()
        });

        let out = apply(records, &query);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.oil_id == "A100"));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let records = vec![
            result("A100", day(1), 10),
            result("A200", day(2), 20),
        ];
        let query = ListQuery::new().filter(TradingResultFilter::default());

        assert_eq!(apply(records.clone(), &query), records);
    }

    #[test]
    fn test_distinct_keeps_first_occurrence_in_input_order() {
        let records = vec![
            result("A100", day(3), 10),
            result("A200", day(1), 20),
            result("A300", day(3), 30),
            result("A400", day(2), 40),
        ];

        let out = distinct_records(records, Field::Date);
        let oils: Vec<_> = out.iter().map(|r| r.oil_id.as_str()).collect();
        assert_eq!(oils, ["A100", "A200", "A400"]);
    }

    #[test]
    fn test_distinct_runs_before_ordering() {
        let records = vec![
            result("A100", day(3), 10),
            result("A200", day(1), 20),
            result("A300", day(3), 30),
        ];
        let query = ListQuery::new()
            .distinct_on(Field::Date)
            .order_by(Field::Date);

        let out = apply(records, &query);
        let dates: Vec<_> = out.iter().map(|r| r.date).collect();
        assert_eq!(dates, [day(1), day(3)]);
        // day(3) survivor is the first occurrence, not the later one
        assert_eq!(out[1].oil_id, "A100");
    }

    #[test]
    fn test_descending_order_is_reverse_of_ascending() {
        let records = vec![
            result("A100", day(2), 10),
            result("A200", day(3), 20),
            result("A300", day(1), 30),
        ];

        let asc = apply(records.clone(), &ListQuery::new().order_by(Field::Date));
        let desc = apply(
            records,
            &ListQuery::new().order_by(Field::Date).descending(),
        );

        let mut reversed = desc;
        reversed.reverse();
        assert_eq!(asc, reversed);
    }

    #[test]
    fn test_ordering_ties_keep_input_order() {
        let records = vec![
            result("A100", day(1), 10),
            result("A200", day(1), 20),
            result("A300", day(1), 30),
        ];

        let out = apply(records, &ListQuery::new().order_by(Field::Date));
        let oils: Vec<_> = out.iter().map(|r| r.oil_id.as_str()).collect();
        assert_eq!(oils, ["A100", "A200", "A300"]);
    }

    #[test]
    fn test_limit_truncates_after_ordering() {
        let records = vec![
            result("A100", day(3), 10),
            result("A200", day(1), 20),
            result("A300", day(2), 30),
        ];
        let query = ListQuery::new().order_by(Field::Date).limit(2);

        let out = apply(records, &query);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, day(1));
        assert_eq!(out[1].date, day(2));
    }

    #[test]
    fn test_limit_zero_yields_empty_result() {
        let records = vec![result("A100", day(1), 10)];
        let out = apply(records, &ListQuery::new().limit(0));
        assert!(out.is_empty());
    }
}
