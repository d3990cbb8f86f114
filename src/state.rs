//! Calibration state, mirror of the host's persisted options object.
//!
//! The host (Signal K or equivalent) owns persistence and the configuration
//! UI; this crate reads the pending flags at start-up, clears each one as
//! the corresponding command is dispatched, and hands the mutated state back
//! through [`Host::save_options`](crate::host::Host::save_options). Field
//! names follow the host schema, so the options object deserializes
//! directly.

use serde::{Deserialize, Serialize};

/// Full calibration state for one DST800 triducer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationState {
    /// NMEA 2000 device address of the triducer. Required before any
    /// command or request can be encoded.
    pub instance: Option<u8>,
    pub depth_offset: DepthOffset,
    pub speed_pulse_count: SpeedPulseCount,
    pub speed_through_water: SpeedThroughWater,
    pub temperature_offset: TemperatureOffset,
}

/// Transducer depth offset: positive for water-surface offset, negative for
/// keel offset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthOffset {
    /// Read the current offset back from the device on next start.
    pub request_value: bool,
    /// Store `value` on the device on next start.
    pub set_value: bool,
    /// Offset in meters. Reflects the last value written or read by this
    /// crate, not necessarily the device's live configuration.
    pub value: Option<f64>,
}

/// Speed pulse count broadcast (PGN 65409), used while calibrating STW.
///
/// `enable` is a persistent setting, not a one-shot flag: while it stays
/// true the reporting request is re-sent on every start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedPulseCount {
    pub enable: bool,
    /// Broadcast interval in seconds.
    pub interval: f64,
}

impl Default for SpeedPulseCount {
    fn default() -> Self {
        Self {
            enable: false,
            interval: 2.0,
        }
    }
}

/// Piecewise-linear STW calibration curve settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedThroughWater {
    /// Read the stored curve back from the device on next start.
    pub request_value: bool,
    /// Restore the factory default curve on next start.
    pub restore_defaults: bool,
    /// Store the curve in `value` on the device on next start.
    pub set_value: bool,
    /// Curve text: rows of space-delimited pulse frequency (Hz) and speed
    /// (m/s) pairs. See [`CalibrationCurve`](crate::curve::CalibrationCurve).
    pub value: String,
}

/// Offset added to the onboard water temperature sensor reading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureOffset {
    /// Read the stored offset back from the device on next start.
    pub request_value: bool,
    /// Store `value` on the device on next start.
    pub set_value: bool,
    /// Offset in Kelvin.
    pub value: Option<f64>,
}
