//! Report naming conventions.
//!
//! The exchange publishes one `.xls` file per trading day at a predictable
//! URL whose file name ends in a fixed-width publication timestamp
//! (`oil_xls_20230921162000.xls`). The trading date of a report comes from
//! that suffix, never from sheet content.

use chrono::{NaiveDate, NaiveDateTime};
use url::Url;

use crate::domain::errors::ExtractionError;

const PUBLICATION_TIME_FORMAT: &str = "%Y%m%d%H%M%S";
const TIMESTAMP_WIDTH: usize = 14;

/// Wall-clock moment the exchange stamps into each daily file name.
const PUBLICATION_HOUR: u32 = 16;
const PUBLICATION_MINUTE: u32 = 20;

/// The publication moment of a given trading day.
pub fn publication_moment(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(PUBLICATION_HOUR, PUBLICATION_MINUTE, 0)
        .expect("publication time is a valid wall-clock time")
}

/// URL of the report published at `moment`.
pub fn report_url(base_url: &str, moment: NaiveDateTime) -> String {
    format!(
        "{}/oil_xls_{}.xls",
        base_url.trim_end_matches('/'),
        moment.format(PUBLICATION_TIME_FORMAT)
    )
}

/// Trading date encoded in a report URL's file name.
///
/// The stem's segment after the last `_` must be the full fixed-width
/// timestamp; anything shorter, longer or non-numeric fails extraction.
pub fn date_from_url(url: &str) -> Result<NaiveDate, ExtractionError> {
    let bad_name = || ExtractionError::BadFileName {
        name: url.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| bad_name())?;
    let file_name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .ok_or_else(bad_name)?;

    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let stamp = stem.rsplit('_').next().ok_or_else(bad_name)?;

    if stamp.len() != TIMESTAMP_WIDTH || !stamp.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad_name());
    }

    NaiveDateTime::parse_from_str(stamp, PUBLICATION_TIME_FORMAT)
        .map(|moment| moment.date())
        .map_err(|_| bad_name())
}

/// Successive publication moments, one day apart, in `[start, end)`.
pub fn date_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> impl Iterator<Item = NaiveDateTime> {
    std::iter::successors(Some(start), |current| {
        current.checked_add_days(chrono::Days::new(1))
    })
    .take_while(move |current| *current < end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_report_url_carries_publication_stamp() {
        let url = report_url(
            "https://spimex.com/upload/reports/oil_xls",
            publication_moment(day(2023, 9, 21)),
        );
        assert_eq!(
            url,
            "https://spimex.com/upload/reports/oil_xls/oil_xls_20230921162000.xls"
        );
    }

    #[test]
    fn test_date_round_trips_through_url() {
        let date = day(2023, 1, 5);
        let url = report_url("https://spimex.com/upload/reports/oil_xls", publication_moment(date));
        assert_eq!(date_from_url(&url).unwrap(), date);
    }

    #[test]
    fn test_missing_timestamp_fails() {
        let err = date_from_url("https://spimex.com/upload/reports/oil_xls/oil_xls.xls");
        assert!(err.is_err());
    }

    #[test]
    fn test_truncated_timestamp_fails() {
        let err = date_from_url("https://spimex.com/upload/reports/oil_xls/oil_xls_20230921.xls");
        assert!(err.is_err());
    }

    #[test]
    fn test_date_range_is_half_open() {
        let start = publication_moment(day(2023, 1, 1));
        let end = publication_moment(day(2023, 1, 4));

        let days: Vec<_> = date_range(start, end).map(|m| m.date()).collect();
        assert_eq!(days, [day(2023, 1, 1), day(2023, 1, 2), day(2023, 1, 3)]);
    }

    #[test]
    fn test_empty_date_range() {
        let start = publication_moment(day(2023, 1, 4));
        assert_eq!(date_range(start, start).count(), 0);
    }
}
