//! Water temperature offset calibration (PGN 126720, proprietary ID 42).

use crate::codec::uint16_le;
use crate::inbound::InboundMessage;
use crate::protocol::group_function::{
    FunctionCode, RAW_INTERVAL_NO_CHANGE, RAW_INTERVAL_OFFSET_NO_CHANGE, RAW_PRIORITY_NO_CHANGE,
    RawMessage, byte_pair, pgn_le3,
};
use crate::protocol::{
    INDUSTRY_GROUP, MANUFACTURER_CODE, PARAM_INDUSTRY, PARAM_MANUFACTURER, PARAM_PROPRIETARY_ID,
    PGN_AIRMAR_PROPRIETARY, PROPRIETARY_CALIBRATE_TEMPERATURE,
};

/// Temperature instance selector: the triducer's onboard water sensor.
pub const ONBOARD_WATER_SENSOR: u8 = 1;

/// Index of the temperature offset parameter.
pub const PARAM_TEMPERATURE_OFFSET: u8 = 7;

fn envelope_with_id() -> [String; 6] {
    [
        byte_pair(PARAM_MANUFACTURER),
        uint16_le(f64::from(MANUFACTURER_CODE)),
        byte_pair(PARAM_INDUSTRY),
        byte_pair(INDUSTRY_GROUP),
        byte_pair(PARAM_PROPRIETARY_ID),
        byte_pair(PROPRIETARY_CALIBRATE_TEMPERATURE),
    ]
}

/// Request the stored temperature offset (read-back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemperatureOffsetRequest;

impl TemperatureOffsetRequest {
    pub fn to_raw(&self, dst: u8) -> RawMessage {
        let mut parts = vec![
            byte_pair(FunctionCode::Request.as_byte()),
            pgn_le3(PGN_AIRMAR_PROPRIETARY),
            RAW_INTERVAL_NO_CHANGE.to_string(),
            RAW_INTERVAL_OFFSET_NO_CHANGE.to_string(),
            byte_pair(4), // parameter pair count
        ];
        parts.extend(envelope_with_id());
        parts.push(byte_pair(5)); // Temperature instance
        parts.push(byte_pair(ONBOARD_WATER_SENSOR));
        RawMessage::group_function(dst, &parts)
    }
}

/// Store a temperature offset on the device.
///
/// The offset is passed through [`uint16_le`] unscaled; the device protocol
/// documents no additional scale factor for this field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureOffsetSet {
    /// Offset in Kelvin, added to the sensor reading.
    pub kelvin: f64,
}

impl TemperatureOffsetSet {
    pub fn to_raw(&self, dst: u8) -> RawMessage {
        let mut parts = vec![
            byte_pair(FunctionCode::Command.as_byte()),
            pgn_le3(PGN_AIRMAR_PROPRIETARY),
            RAW_PRIORITY_NO_CHANGE.to_string(),
            byte_pair(5), // parameter pair count
        ];
        parts.extend(envelope_with_id());
        parts.push(byte_pair(5)); // Temperature instance
        parts.push(byte_pair(ONBOARD_WATER_SENSOR));
        parts.push(byte_pair(PARAM_TEMPERATURE_OFFSET));
        parts.push(uint16_le(self.kelvin));
        RawMessage::group_function(dst, &parts)
    }
}

/// A Calibrate Temperature report, captured for diagnostic display only.
/// The offset is deliberately not written back into calibration state.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureCalibrationReport {
    /// Pretty-printed analyzer JSON of the full message.
    pub raw: String,
}

impl TemperatureCalibrationReport {
    pub fn capture(msg: &InboundMessage) -> Self {
        Self {
            raw: serde_json::to_string_pretty(msg).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_layout() {
        let msg = TemperatureOffsetRequest.to_raw(35);
        assert_eq!(
            msg.data,
            "00,00,ef,01,ff,ff,ff,ff,ff,ff,04,01,87,00,03,04,04,2a,05,01"
        );
    }

    #[test]
    fn set_layout() {
        let msg = TemperatureOffsetSet { kelvin: 2.0 }.to_raw(35);
        assert_eq!(
            msg.data,
            "01,00,ef,01,f8,05,01,87,00,03,04,04,2a,05,01,07,02,00"
        );
    }

    #[test]
    fn set_negative_offset_wraps() {
        let msg = TemperatureOffsetSet { kelvin: -1.0 }.to_raw(35);
        assert!(msg.data.ends_with("07,ff,ff"));
    }
}
