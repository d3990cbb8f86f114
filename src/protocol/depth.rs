//! Depth offset command and water depth report (PGN 128267).

use crate::codec;
use crate::error::Result;
use crate::inbound::InboundMessage;
use crate::protocol::group_function::GroupFunctionCommand;
use crate::protocol::{PARAM_DEPTH_OFFSET, PGN_WATER_DEPTH};

/// Store the transducer depth offset on the device.
///
/// The offset travels as parameter 3 of a commanded PGN 128267, signed, in
/// millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOffsetSet {
    /// Offset in meters; positive for water-surface offset, negative for keel.
    pub meters: f64,
}

impl DepthOffsetSet {
    pub fn to_group_function(&self, dst: u8) -> GroupFunctionCommand {
        GroupFunctionCommand::command(dst, PGN_WATER_DEPTH)
            .with_parameter(PARAM_DEPTH_OFFSET, codec::to_millimeters(self.meters))
    }
}

/// A water depth broadcast. The device transmits these continuously; only
/// the `Offset` field matters here, and only while a read-back is pending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterDepthReport {
    /// Configured transducer offset, meters.
    pub offset: f64,
}

impl WaterDepthReport {
    pub fn decode(msg: &InboundMessage) -> Result<Self> {
        Ok(Self {
            offset: msg.f64_field("Offset")?,
        })
    }
}

/// A Calibrate Depth report (PGN 126720, proprietary ID 40), captured for
/// diagnostic display only.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthCalibrationReport {
    /// Pretty-printed analyzer JSON of the full message.
    pub raw: String,
}

impl DepthCalibrationReport {
    pub fn capture(msg: &InboundMessage) -> Self {
        Self {
            raw: serde_json::to_string_pretty(msg).unwrap_or_default(),
        }
    }
}
