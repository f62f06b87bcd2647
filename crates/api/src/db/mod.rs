mod sqlite;

pub use sqlite::{ClimateData, ClimateDb};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{
    format_description::BorrowedFormatItem,
    macros::{date, format_description},
    Date,
};
use utoipa::ToSchema;

/// Observation dates are stored as zero-padded ISO `YYYY-MM-DD` strings, so
/// lexicographic comparison in SQL agrees with chronological order.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// One year before the final observation in the bundled dataset (2017-08-23).
/// Kept as a literal for compatibility with existing callers; it does not
/// track the live contents of the store and must be revisited if the dataset
/// is ever reloaded.
pub const LAST_YEAR_CUTOFF: Date = date!(2016 - 08 - 23);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to format date string: {0}")]
    DateFormat(#[from] time::error::Format),
}

/// Parse a path segment as a calendar date in `%Y-%m-%d` form.
pub fn parse_iso_date(input: &str) -> Result<Date, time::error::Parse> {
    Date::parse(input, DATE_FORMAT)
}

/// A `(date, tobs)` pair as stored in the measurement table.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedTobs {
    pub date: String,
    pub tobs: f64,
}

impl DatedTobs {
    pub fn new(date: &str, tobs: f64) -> Self {
        Self {
            date: date.to_owned(),
            tobs,
        }
    }
}

/// Date bounds for a temperature query, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TobsQuery {
    pub start: Date,
    pub end: Option<Date>,
}

/// Min/max/mean over a set of temperature observations.
#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct TobsSummary {
    #[serde(rename = "TMIN")]
    pub tmin: f64,
    #[serde(rename = "TMAX")]
    pub tmax: f64,
    #[serde(rename = "TAVG")]
    pub tavg: f64,
}

impl TobsSummary {
    /// Returns `None` when there are no readings to summarize.
    pub fn from_readings(readings: &[f64]) -> Option<Self> {
        if readings.is_empty() {
            return None;
        }

        let mut tmin = f64::INFINITY;
        let mut tmax = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for &tobs in readings {
            tmin = tmin.min(tobs);
            tmax = tmax.max(tobs);
            sum += tobs;
        }

        Some(Self {
            tmin,
            tmax,
            tavg: sum / readings.len() as f64,
        })
    }
}

/// Fold `(date, tobs)` rows into a date-keyed map. When several rows share a
/// date, the last row in store order wins.
pub fn tobs_by_date(rows: Vec<DatedTobs>) -> BTreeMap<String, f64> {
    let mut by_date = BTreeMap::new();
    for row in rows {
        by_date.insert(row.date, row.tobs);
    }
    by_date
}
