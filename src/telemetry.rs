//! Sentinel values for telemetry the hardware cannot measure
//!
//! The transport reports unmeasurable values as `None`. Callers that speak
//! the numeric protocol convert with [`raw`].

/// RSSI not available
pub const INVALID_RSSI: i16 = -256;
/// SNR not available
pub const INVALID_SNR: i16 = -256;
/// Transmit power level not available
pub const INVALID_LEVEL: i16 = -256;
/// Transmit power percentage not available
pub const INVALID_PERCENT: i16 = -100;

/// Numeric form of an optional reading, `sentinel` when absent
pub fn raw<T: Into<i16>>(reading: Option<T>, sentinel: i16) -> i16 {
    reading.map_or(sentinel, Into::into)
}
