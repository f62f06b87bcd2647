use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{
    db::{self, parse_iso_date, tobs_by_date, TobsQuery, TobsSummary, LAST_YEAR_CUTOFF},
    AppState,
};

pub const DATE_FORMAT_ERROR: &str = "dates must be in %Y-%m-%d format";
pub const RANGE_ORDER_ERROR: &str = "start date cannot be greater than end date";
pub const START_PAST_MAX_ERROR: &str = "start date is past the maximum date in the dataset";
pub const RANGE_PAST_MAX_ERROR: &str = "chosen date is past the maximum date in the dataset";

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: message.to_owned(),
        }),
    )
}

fn store_error(err: db::Error) -> ApiError {
    error!("error querying measurement store: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "failed to query the dataset".to_owned(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Temperature observations for the final year of data, keyed by date. Duplicate dates collapse to the last row in store order", body = BTreeMap<String, f64>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the measurement store", body = ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    let rows = state
        .climate_db
        .observations_since(LAST_YEAR_CUTOFF)
        .await
        .map_err(store_error)?;

    Ok(Json(tobs_by_date(rows)))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "All station names, in store order", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the measurement store", body = ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .climate_db
        .station_names()
        .await
        .map_err(store_error)?;

    Ok(Json(names))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations for the final year of data, duplicates preserved, in store order", body = Vec<f64>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the measurement store", body = ErrorBody)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<f64>>, ApiError> {
    let readings = state
        .climate_db
        .temperature_readings(&TobsQuery {
            start: LAST_YEAR_CUTOFF,
            end: None,
        })
        .await
        .map_err(store_error)?;

    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "Lower bound date (inclusive), %Y-%m-%d"),
    ),
    responses(
        (status = OK, description = "Min/max/mean temperature for all observations on or after the start date", body = TobsSummary),
        (status = NOT_FOUND, description = "Malformed date, or no observations on or after the start date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the measurement store", body = ErrorBody)
    ))]
pub async fn start_summary(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<TobsSummary>, ApiError> {
    let Ok(start) = parse_iso_date(&start) else {
        return Err(not_found(DATE_FORMAT_ERROR));
    };

    let readings = state
        .climate_db
        .temperature_readings(&TobsQuery { start, end: None })
        .await
        .map_err(store_error)?;

    TobsSummary::from_readings(&readings)
        .map(Json)
        .ok_or_else(|| not_found(START_PAST_MAX_ERROR))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Lower bound date (inclusive), %Y-%m-%d"),
        ("end" = String, Path, description = "Upper bound date (inclusive), %Y-%m-%d"),
    ),
    responses(
        (status = OK, description = "Min/max/mean temperature for observations between the bounds, inclusive", body = TobsSummary),
        (status = NOT_FOUND, description = "Malformed date, start after end, or no observations in the range", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the measurement store", body = ErrorBody)
    ))]
pub async fn range_summary(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TobsSummary>, ApiError> {
    let (Ok(start), Ok(end)) = (parse_iso_date(&start), parse_iso_date(&end)) else {
        return Err(not_found(DATE_FORMAT_ERROR));
    };

    if start > end {
        return Err(not_found(RANGE_ORDER_ERROR));
    }

    let readings = state
        .climate_db
        .temperature_readings(&TobsQuery {
            start,
            end: Some(end),
        })
        .await
        .map_err(store_error)?;

    TobsSummary::from_readings(&readings)
        .map(Json)
        .ok_or_else(|| not_found(RANGE_PAST_MAX_ERROR))
}
