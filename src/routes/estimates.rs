// src/routes/estimates.rs
//! Estimation endpoints.
//!
//! Thin JSON wrappers over the estimation engine, mounted under
//! `/{tenant}/core/estimates/`. The engine is pure, so these handlers never
//! touch a database; insufficient or malformed samples are answered with
//! `422 Unprocessable Entity` and the reason.

use std::fmt;

use axum::{http::StatusCode, response::IntoResponse, response::Response, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::estimation::{
    self, DistanceRecord, ValueRecord, DEFAULT_OUTLIER_M, POWER_PRECISION, STANDARD_PRECISION,
};
use crate::tenancy;

// ---

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // ---
    Router::new()
        .route("/{tenant}/core/estimates/idw", post(idw))
        .route("/{tenant}/core/estimates/idw-joined", post(idw_joined))
        .route("/{tenant}/core/estimates/idw-readings", post(idw_readings))
        .route("/{tenant}/core/estimates/outliers", post(outliers))
        .route("/{tenant}/core/estimates/nearest", post(nearest))
        .route("/{tenant}/core/estimates/deviation", post(deviation))
        .route("/{tenant}/core/estimates/trend", post(trend))
}

fn unprocessable(reason: impl fmt::Display) -> Response {
    // ---
    debug!("Estimate rejected for '{}': {}", tenancy::get_current(), reason);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(reason.to_string())).into_response()
}

/// A single estimated value.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    value: f64,
}

// ---

#[derive(Debug, Deserialize)]
pub struct IdwRequest {
    distances: Vec<Option<f64>>,
    values: Vec<Option<f64>>,
}

async fn idw(Json(body): Json<IdwRequest>) -> Response {
    // ---
    info!("POST estimates/idw - {} samples", body.distances.len());

    match estimation::try_inverse_distance_weight(&body.distances, &body.values) {
        Ok(value) => (StatusCode::OK, Json(EstimateResponse { value })).into_response(),
        Err(e) => unprocessable(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct JoinedIdwRequest {
    distances: Vec<DistanceRecord<String>>,
    values: Vec<ValueRecord<String>>,
}

async fn idw_joined(Json(body): Json<JoinedIdwRequest>) -> Response {
    // ---
    info!(
        "POST estimates/idw-joined - {} distances, {} values",
        body.distances.len(),
        body.values.len()
    );

    match estimation::try_inverse_distance_weight_joined(&body.distances, &body.values) {
        Ok(value) => (StatusCode::OK, Json(EstimateResponse { value })).into_response(),
        Err(e) => unprocessable(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadingsIdwRequest {
    distances: Vec<DistanceRecord<String>>,
    readings: Vec<ValueRecord<String>>,
}

async fn idw_readings(Json(body): Json<ReadingsIdwRequest>) -> Response {
    // ---
    info!(
        "POST estimates/idw-readings - {} distances, {} readings",
        body.distances.len(),
        body.readings.len()
    );

    match estimation::try_inverse_distance_weight_from_readings(&body.distances, &body.readings) {
        Ok(value) => (StatusCode::OK, Json(EstimateResponse { value })).into_response(),
        Err(e) => unprocessable(e),
    }
}

// ---

#[derive(Debug, Deserialize)]
pub struct OutliersRequest {
    data: Vec<f64>,
    m: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OutliersResponse {
    kept: Vec<f64>,
    rejected: usize,
}

async fn outliers(Json(body): Json<OutliersRequest>) -> Response {
    // ---
    let m = body.m.unwrap_or(DEFAULT_OUTLIER_M);

    match estimation::reject_outliers(&body.data, m) {
        Some(kept) => {
            let rejected = body.data.len() - kept.len();
            (StatusCode::OK, Json(OutliersResponse { kept, rejected })).into_response()
        }
        None => unprocessable("At least two finite points are required"),
    }
}

#[derive(Debug, Deserialize)]
pub struct NearestRequest {
    point: Vec<f64>,
    candidates: Vec<Vec<f64>>,
    radius: f64,
}

#[derive(Debug, Serialize)]
pub struct NearestResponse {
    within: Vec<bool>,
    closest: usize,
}

async fn nearest(Json(body): Json<NearestRequest>) -> Response {
    // ---
    match estimation::nearest_within_radius(&body.point, &body.candidates, body.radius) {
        Some((within, closest)) => {
            (StatusCode::OK, Json(NearestResponse { within, closest })).into_response()
        }
        None => unprocessable("Candidates must be non-empty and match the point's dimensions"),
    }
}

// ---

/// Rounding domain of a deviation.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    #[default]
    Standard,
    Power,
}

#[derive(Debug, Deserialize)]
pub struct DeviationRequest {
    values: Vec<Option<f64>>,
    #[serde(default)]
    precision: Precision,
}

async fn deviation(Json(body): Json<DeviationRequest>) -> Response {
    // ---
    let places = match body.precision {
        Precision::Standard => STANDARD_PRECISION,
        Precision::Power => POWER_PRECISION,
    };

    match estimation::stdev(&body.values, places) {
        Some(value) => (StatusCode::OK, Json(EstimateResponse { value })).into_response(),
        None => unprocessable("At least two non-zero values are required"),
    }
}

#[derive(Debug, Deserialize)]
pub struct TrendRequest {
    previous: Option<f64>,
    current: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    trend: i8,
}

async fn trend(Json(body): Json<TrendRequest>) -> Json<TrendResponse> {
    Json(TrendResponse {
        trend: estimation::trend(body.previous, body.current),
    })
}
