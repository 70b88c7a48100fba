//! Diurnal activity and net-bias curves shared by every station.

/// Hours in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Relative trip volume per hour of day (unitless, may exceed 1).
pub const ACTIVITY_WEIGHT: [f64; HOURS_PER_DAY] = [
    0.10, 0.06, 0.04, 0.03, 0.03, 0.05, 0.12, 0.26, 0.34, 0.30, 0.28, 0.26, //
    0.22, 0.20, 0.18, 0.20, 0.24, 0.32, 0.38, 0.30, 0.24, 0.18, 0.14, 0.12,
];

/// Signed share of trips that are net returns (positive) or net departures
/// (negative) per hour of day.
pub const NET_BIAS: [f64; HOURS_PER_DAY] = [
    0.18, 0.12, 0.08, 0.02, -0.05, -0.18, -0.40, -0.36, -0.22, -0.04, 0.06, 0.12, //
    0.16, 0.10, 0.02, -0.04, -0.08, -0.06, 0.12, 0.24, 0.28, 0.20, 0.16, 0.12,
];

/// Activity weight for an absolute hour index (wraps every 24 hours).
pub fn activity_at(hour_index: usize) -> f64 {
    ACTIVITY_WEIGHT[hour_index % HOURS_PER_DAY]
}

/// Net bias for an absolute hour index (wraps every 24 hours).
pub fn bias_at(hour_index: usize) -> f64 {
    NET_BIAS[hour_index % HOURS_PER_DAY]
}
