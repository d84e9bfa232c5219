/// Default capacity of the past (retention) buffer.
pub const DEFAULT_RETENTION_CAPACITY: usize = 10;

/// Default capacity of the pending (protention) buffer.
pub const DEFAULT_PROTENTION_CAPACITY: usize = 5;

/// Thickness weight of a full past buffer.
pub const RETENTION_WEIGHT: f64 = 0.4;

/// Thickness weight of an occupied current slot.
pub const IMPRESSION_WEIGHT: f64 = 0.3;

/// Thickness weight of a full pending buffer.
pub const PROTENTION_WEIGHT: f64 = 0.3;

/// Horizon names carrying this prefix are inner horizons; all others are outer.
pub const INNER_HORIZON_PREFIX: &str = "inner_";

/// Residual records with more keys than this reach at least adequate evidence.
pub const ADEQUATE_KEY_THRESHOLD: usize = 3;

/// Number of hex characters kept from an experience digest.
pub const RECORD_ID_LEN: usize = 16;
