//! Spatial estimation engine.
//!
//! Pure computation over in-memory samples supplied by the caller:
//! Inverse Distance Weighting, outlier rejection, neighbourhood queries and
//! the rounding/trend/deviation helpers the derived values are reported with.
//! Nothing here touches storage or HTTP.

mod error;
mod geometry;
mod idw;
mod stats;

pub use error::EstimateError;
pub use geometry::{euclidean, nearest_within_radius};
pub use idw::{
    aggregate_medians, inverse_distance_weight, inverse_distance_weight_from_readings,
    inverse_distance_weight_joined, try_inverse_distance_weight,
    try_inverse_distance_weight_from_readings, try_inverse_distance_weight_joined, DistanceRecord,
    ValueRecord, IDW_POWER,
};
pub use stats::{
    deviation, deviation_power, median, reject_outliers, round2, round4, round_to, stdev, trend,
    POWER_PRECISION, STANDARD_PRECISION,
};

/// Default outlier threshold, in standard deviations.
pub const DEFAULT_OUTLIER_M: f64 = 2.0;
