//! Inverse Distance Weighting.
//!
//! Estimates the value at a query point from samples at known distances,
//! weighting each sample by `1 / distance³`. The cubic falloff makes the
//! estimate follow the nearest sensors more closely than the usual squared
//! falloff would.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::{median, round2, EstimateError};

/// Exponent of the distance in the sample weights.
pub const IDW_POWER: i32 = 3;

// ---

/// Distance from the query point to the entity identified by `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord<K> {
    // ---
    pub key: K,
    #[serde(alias = "dist")]
    pub distance: Option<f64>,
}

/// Aggregated measurement at the entity identified by `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord<K> {
    // ---
    pub key: K,
    #[serde(alias = "median")]
    pub value: Option<f64>,
}

/// IDW estimate from index-aligned `distances` and `values`, rounded to two
/// decimals.
///
/// Samples without a distance are ignored. When the query point coincides
/// with one or more samples (distance exactly zero) the estimate is the mean
/// of those samples alone.
pub fn try_inverse_distance_weight(
    distances: &[Option<f64>],
    values: &[Option<f64>],
) -> Result<f64, EstimateError> {
    // ---
    if distances.len() != values.len() {
        return Err(EstimateError::LengthMismatch {
            distances: distances.len(),
            values: values.len(),
        });
    }

    let mut samples = Vec::with_capacity(distances.len());
    for (index, (distance, value)) in distances.iter().zip(values).enumerate() {
        let Some(distance) = *distance else {
            continue;
        };
        if !distance.is_finite() || distance < 0.0 {
            return Err(EstimateError::InvalidDistance { index, distance });
        }
        let value = value.ok_or(EstimateError::MissingValue { index })?;
        samples.push((distance, value));
    }

    if samples.is_empty() {
        return Err(EstimateError::NoData);
    }

    let coincident: Vec<f64> = samples
        .iter()
        .filter(|(distance, _)| *distance == 0.0)
        .map(|(_, value)| *value)
        .collect();

    let estimate = if coincident.is_empty() {
        let (weighted, total_weight) =
            samples
                .iter()
                .fold((0.0, 0.0), |(weighted, total), (distance, value)| {
                    let weight = 1.0 / distance.powi(IDW_POWER);
                    (weighted + weight * value, total + weight)
                });
        weighted / total_weight
    } else {
        coincident.iter().sum::<f64>() / coincident.len() as f64
    };

    // Distances small enough to overflow the weights leave nothing usable
    round2(Some(estimate)).ok_or(EstimateError::NoData)
}

/// [`try_inverse_distance_weight`] with every failure collapsed to `None`.
pub fn inverse_distance_weight(distances: &[Option<f64>], values: &[Option<f64>]) -> Option<f64> {
    // ---
    try_inverse_distance_weight(distances, values)
        .inspect_err(|e| tracing::debug!("IDW estimate rejected: {}", e))
        .ok()
}

/// Partially merged sample: `None` means the key never appeared on that side.
struct MergedSample {
    distance: Option<Option<f64>>,
    value: Option<Option<f64>>,
}

fn merge_slot<'a, K>(
    order: &mut Vec<K>,
    merged: &'a mut HashMap<K, MergedSample>,
    key: &K,
) -> &'a mut MergedSample
where
    K: Eq + Hash + Clone,
{
    // ---
    merged.entry(key.clone()).or_insert_with(|| {
        order.push(key.clone());
        MergedSample {
            distance: None,
            value: None,
        }
    })
}

/// IDW estimate from distance and value records joined on their key.
///
/// Records are merged per key in order of first appearance (distances first),
/// later records overwriting earlier ones. A key found on only one side makes
/// the whole estimate fail with [`EstimateError::IncompleteSample`].
pub fn try_inverse_distance_weight_joined<K>(
    distance_records: &[DistanceRecord<K>],
    value_records: &[ValueRecord<K>],
) -> Result<f64, EstimateError>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    // ---
    let mut order: Vec<K> = Vec::new();
    let mut merged: HashMap<K, MergedSample> = HashMap::new();

    for record in distance_records {
        merge_slot(&mut order, &mut merged, &record.key).distance = Some(record.distance);
    }
    for record in value_records {
        merge_slot(&mut order, &mut merged, &record.key).value = Some(record.value);
    }

    let mut distances = Vec::with_capacity(order.len());
    let mut values = Vec::with_capacity(order.len());
    for key in &order {
        let sample = &merged[key];
        let incomplete = |field| EstimateError::IncompleteSample {
            key: key.to_string(),
            field,
        };
        distances.push(sample.distance.ok_or_else(|| incomplete("distance"))?);
        values.push(sample.value.ok_or_else(|| incomplete("value"))?);
    }

    try_inverse_distance_weight(&distances, &values)
}

/// [`try_inverse_distance_weight_joined`] with every failure collapsed to `None`.
pub fn inverse_distance_weight_joined<K>(
    distance_records: &[DistanceRecord<K>],
    value_records: &[ValueRecord<K>],
) -> Option<f64>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    // ---
    try_inverse_distance_weight_joined(distance_records, value_records)
        .inspect_err(|e| tracing::debug!("Joined IDW estimate rejected: {}", e))
        .ok()
}

/// Collapse raw readings to one [`ValueRecord`] per key holding the median
/// of its non-null readings.
///
/// Keys keep their order of first appearance. A key whose readings are all
/// null keeps a null value.
pub fn aggregate_medians<K>(readings: &[ValueRecord<K>]) -> Vec<ValueRecord<K>>
where
    K: Eq + Hash + Clone,
{
    // ---
    let mut order: Vec<K> = Vec::new();
    let mut grouped: HashMap<K, Vec<f64>> = HashMap::new();

    for reading in readings {
        let slot = grouped.entry(reading.key.clone()).or_insert_with(|| {
            order.push(reading.key.clone());
            Vec::new()
        });
        slot.extend(reading.value);
    }

    order
        .into_iter()
        .map(|key| {
            let value = grouped.get(&key).and_then(|values| median(values));
            ValueRecord { key, value }
        })
        .collect()
}

/// IDW estimate from distance records and raw readings: the readings are
/// reduced to per-key medians, then joined with the distances on their key.
pub fn try_inverse_distance_weight_from_readings<K>(
    distance_records: &[DistanceRecord<K>],
    readings: &[ValueRecord<K>],
) -> Result<f64, EstimateError>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    // ---
    let medians = aggregate_medians(readings);
    tracing::trace!("{} readings reduced to {} medians", readings.len(), medians.len());
    try_inverse_distance_weight_joined(distance_records, &medians)
}

/// [`try_inverse_distance_weight_from_readings`] with every failure collapsed
/// to `None`.
pub fn inverse_distance_weight_from_readings<K>(
    distance_records: &[DistanceRecord<K>],
    readings: &[ValueRecord<K>],
) -> Option<f64>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    // ---
    try_inverse_distance_weight_from_readings(distance_records, readings)
        .inspect_err(|e| tracing::debug!("Readings IDW estimate rejected: {}", e))
        .ok()
}
