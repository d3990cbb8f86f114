//! Speed-through-water calibration and speed pulse reporting.
//!
//! Four commands (pulse reporting, curve request, curve write, factory
//! restore) and two inbound reports (pulse count broadcasts, stored-curve
//! readback). The curve travels as interleaved parameter pairs of a
//! commanded PGN 126720, proprietary ID 41 (Calibrate Speed).

use crate::codec::{self, uint32_le};
use crate::curve::{CalibrationCurve, CurvePoint};
use crate::error::{CalibrationError, Result};
use crate::inbound::InboundMessage;
use crate::protocol::group_function::{
    FunctionCode, GroupFunctionCommand, RAW_INTERVAL_NO_CHANGE, RAW_INTERVAL_OFFSET_NO_CHANGE,
    RAW_PRIORITY_NO_CHANGE, RawMessage, byte_pair, pgn_le3,
};
use crate::protocol::{
    INDUSTRY_GROUP, MANUFACTURER_CODE, PARAM_INDUSTRY, PARAM_MANUFACTURER, PARAM_POINT_COUNT,
    PARAM_PROPRIETARY_ID, PGN_AIRMAR_PROPRIETARY, PGN_SPEED_PULSE, PROPRIETARY_CALIBRATE_SPEED,
};

/// Point count sentinel that restores the factory default curve.
pub const POINT_COUNT_FACTORY_DEFAULT: u8 = 0xFE;

/// Index of the first curve data-point parameter.
pub const PARAM_FIRST_POINT: u8 = 6;

/// Shared Airmar envelope for raw 126720 group functions.
fn airmar_envelope() -> [String; 4] {
    [
        byte_pair(PARAM_MANUFACTURER),
        codec::uint16_le(f64::from(MANUFACTURER_CODE)),
        byte_pair(PARAM_INDUSTRY),
        byte_pair(INDUSTRY_GROUP),
    ]
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Ask the device to broadcast speed pulse counts (PGN 65409) at a fixed
/// cadence. Used while collecting data for a new calibration curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedPulseEnable {
    /// Broadcast interval in seconds; transmitted in milliseconds.
    pub interval_seconds: f64,
}

impl SpeedPulseEnable {
    pub fn to_raw(&self, dst: u8) -> RawMessage {
        let mut parts = vec![
            byte_pair(FunctionCode::Request.as_byte()),
            pgn_le3(PGN_SPEED_PULSE),
            uint32_le(self.interval_seconds * 1000.0),
            "00,00".to_string(), // transmission interval offset: immediate
            byte_pair(2),        // parameter pair count
        ];
        parts.extend(airmar_envelope());
        RawMessage::group_function(dst, &parts)
    }
}

/// Request the stored STW calibration curve (read-back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StwCurveRequest;

impl StwCurveRequest {
    pub fn to_raw(&self, dst: u8) -> RawMessage {
        let mut parts = vec![
            byte_pair(FunctionCode::Request.as_byte()),
            pgn_le3(PGN_AIRMAR_PROPRIETARY),
            RAW_INTERVAL_NO_CHANGE.to_string(),
            RAW_INTERVAL_OFFSET_NO_CHANGE.to_string(),
            byte_pair(3), // parameter pair count
        ];
        parts.extend(airmar_envelope());
        parts.push(byte_pair(PARAM_PROPRIETARY_ID));
        parts.push(byte_pair(PROPRIETARY_CALIBRATE_SPEED));
        RawMessage::group_function(dst, &parts)
    }
}

/// Restore the factory default STW curve: a curve write whose point count
/// is the [`POINT_COUNT_FACTORY_DEFAULT`] sentinel, with no data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StwRestoreDefaults;

impl StwRestoreDefaults {
    pub fn to_raw(&self, dst: u8) -> RawMessage {
        let mut parts = vec![
            byte_pair(FunctionCode::Command.as_byte()),
            pgn_le3(PGN_AIRMAR_PROPRIETARY),
            RAW_PRIORITY_NO_CHANGE.to_string(),
            byte_pair(4), // parameter pair count
        ];
        parts.extend(airmar_envelope());
        parts.push(byte_pair(PARAM_PROPRIETARY_ID));
        parts.push(byte_pair(PROPRIETARY_CALIBRATE_SPEED));
        parts.push(byte_pair(PARAM_POINT_COUNT));
        parts.push(byte_pair(POINT_COUNT_FACTORY_DEFAULT));
        RawMessage::group_function(dst, &parts)
    }
}

/// Write a calibration curve to the device.
///
/// Parameters: the Airmar envelope, proprietary ID, point count, then one
/// (frequency, speed) parameter pair per point starting at parameter 6 —
/// `4 + 2 × n` parameters in total. Frequencies go out in 0.1 Hz units,
/// speeds in 0.01 m/s units. Point order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct StwCurveSet {
    pub curve: CalibrationCurve,
}

impl StwCurveSet {
    pub fn to_group_function(&self, dst: u8) -> GroupFunctionCommand {
        let mut cmd = GroupFunctionCommand::command(dst, PGN_AIRMAR_PROPRIETARY)
            .with_parameter(PARAM_MANUFACTURER, i64::from(MANUFACTURER_CODE))
            .with_parameter(PARAM_INDUSTRY, i64::from(INDUSTRY_GROUP))
            .with_parameter(PARAM_PROPRIETARY_ID, i64::from(PROPRIETARY_CALIBRATE_SPEED))
            .with_parameter(PARAM_POINT_COUNT, self.curve.len() as i64);
        for (i, point) in self.curve.points().iter().enumerate() {
            let index = PARAM_FIRST_POINT + 2 * i as u8;
            cmd = cmd
                .with_parameter(index, codec::to_decihertz(point.frequency))
                .with_parameter(index + 1, codec::to_centimeters_per_second(point.speed));
        }
        cmd
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A speed pulse count broadcast (PGN 65409).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedPulseReport {
    pub pulses: f64,
    /// Counting interval duration, seconds.
    pub duration: f64,
}

impl SpeedPulseReport {
    pub fn decode(msg: &InboundMessage) -> Result<Self> {
        Ok(Self {
            pulses: msg.f64_field("Number of pulses received")?,
            duration: msg.f64_field("Duration of interval")?,
        })
    }

    /// Paddlewheel pulse rate, pulses per second.
    pub fn pulse_rate(&self) -> f64 {
        self.pulses / self.duration
    }
}

/// The stored calibration curve, as reported by a Calibrate Speed group
/// function (PGN 126720, proprietary ID 41).
#[derive(Debug, Clone, PartialEq)]
pub struct StwCurveReport {
    pub curve: CalibrationCurve,
}

impl StwCurveReport {
    pub fn decode(msg: &InboundMessage) -> Result<Self> {
        let rows = msg.list_field("list")?;
        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            let frequency = row
                .get("Input frequency")
                .and_then(serde_json::Value::as_f64)
                .ok_or_else(|| CalibrationError::bad_field(msg.pgn, "Input frequency", row))?;
            let speed = row
                .get("Output speed")
                .and_then(serde_json::Value::as_f64)
                .ok_or_else(|| CalibrationError::bad_field(msg.pgn, "Output speed", row))?;
            points.push(CurvePoint { frequency, speed });
        }
        Ok(Self {
            curve: CalibrationCurve::new(points),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_enable_layout() {
        let msg = SpeedPulseEnable { interval_seconds: 2.0 }.to_raw(35);
        assert_eq!(msg.data, "00,81,ff,00,d0,07,00,00,00,00,02,01,87,00,03,04");
    }

    #[test]
    fn curve_request_carries_no_change_sentinels() {
        let msg = StwCurveRequest.to_raw(35);
        assert_eq!(msg.data, "00,00,ef,01,ff,ff,ff,ff,ff,ff,03,01,87,00,03,04,04,29");
    }

    #[test]
    fn restore_defaults_layout() {
        let msg = StwRestoreDefaults.to_raw(35);
        assert_eq!(msg.data, "01,00,ef,01,f8,04,01,87,00,03,04,04,29,05,fe");
    }

    #[test]
    fn curve_set_parameter_layout() {
        let curve = CalibrationCurve::parse("10.0 1.0\n20.0 2.0").unwrap();
        let cmd = StwCurveSet { curve }.to_group_function(35);
        assert_eq!(cmd.pgn, PGN_AIRMAR_PROPRIETARY);
        // 4 header parameters plus one pair per point
        assert_eq!(cmd.parameter_count(), 4 + 2 * 2);
        let p = &cmd.parameters;
        assert_eq!((p[0].index, p[0].value), (1, 135));
        assert_eq!((p[1].index, p[1].value), (3, 4));
        assert_eq!((p[2].index, p[2].value), (4, 41));
        assert_eq!((p[3].index, p[3].value), (5, 2));
        assert_eq!((p[4].index, p[4].value), (6, 100)); // 10.0 Hz → 0.1 Hz units
        assert_eq!((p[5].index, p[5].value), (7, 100)); // 1.0 m/s → 0.01 m/s units
        assert_eq!((p[6].index, p[6].value), (8, 200));
        assert_eq!((p[7].index, p[7].value), (9, 200));
    }

    #[test]
    fn pulse_report_rate() {
        let msg = InboundMessage::parse(
            r#"{"pgn":65409,"src":35,"fields":{
                "Number of pulses received":100,"Duration of interval":2.0}}"#,
        )
        .unwrap();
        let report = SpeedPulseReport::decode(&msg).unwrap();
        assert_eq!(report.pulse_rate(), 50.0);
    }

    #[test]
    fn curve_report_preserves_order() {
        let msg = InboundMessage::parse(
            r#"{"pgn":126720,"src":35,"fields":{
                "Manufacturer Code":"Airmar","Industry Code":"Marine Industry",
                "Proprietary ID":"Calibrate Speed",
                "list":[{"Input frequency":20.0,"Output speed":2.0},
                        {"Input frequency":10.0,"Output speed":1.0}]}}"#,
        )
        .unwrap();
        let report = StwCurveReport::decode(&msg).unwrap();
        assert_eq!(report.curve.to_string(), "20 2\n10 1");
    }

    #[test]
    fn curve_report_with_malformed_row_fails() {
        let msg = InboundMessage::parse(
            r#"{"pgn":126720,"src":35,"fields":{"list":[{"Input frequency":10.0}]}}"#,
        )
        .unwrap();
        assert!(StwCurveReport::decode(&msg).is_err());
    }
}
