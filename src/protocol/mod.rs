//! Message types and encode/decode dispatch.
//!
//! - [`Command`] — calibration messages we send to the triducer, each
//!   wrapped in a Command Group Function (PGN 126208)
//! - [`Event`] — inbound bus messages this client recognizes, decoded from
//!   the analyzer's field maps into typed reports
//!
//! Everything else on the bus decodes to `None` and is ignored.

pub mod access;
pub mod ack;
pub mod depth;
pub mod group_function;
pub mod speed;
pub mod temperature;

use crate::error::Result;
use crate::inbound::InboundMessage;
use self::group_function::{GroupFunctionCommand, RawMessage};

// ---------------------------------------------------------------------------
// PGNs
// ---------------------------------------------------------------------------

/// Command/Request/Acknowledge Group Function.
pub const PGN_GROUP_FUNCTION: u32 = 126208;
/// Proprietary: access level (unlock handshake).
pub const PGN_ACCESS_LEVEL: u32 = 65287;
/// Proprietary: speed pulse count broadcast.
pub const PGN_SPEED_PULSE: u32 = 65409;
/// Addressable manufacturer-proprietary PGN carrying the calibration
/// sub-commands.
pub const PGN_AIRMAR_PROPRIETARY: u32 = 126720;
/// Water depth broadcast.
pub const PGN_WATER_DEPTH: u32 = 128267;

// ---------------------------------------------------------------------------
// Proprietary envelope
// ---------------------------------------------------------------------------

/// Airmar's NMEA 2000 manufacturer code.
pub const MANUFACTURER_CODE: u16 = 135;
/// Marine industry group.
pub const INDUSTRY_GROUP: u8 = 4;
/// Analyzer label for [`MANUFACTURER_CODE`].
pub const MANUFACTURER_LABEL: &str = "Airmar";
/// Analyzer label for [`INDUSTRY_GROUP`].
pub const INDUSTRY_LABEL: &str = "Marine Industry";

/// Calibrate Speed proprietary sub-command.
pub const PROPRIETARY_CALIBRATE_SPEED: u8 = 41;
/// Calibrate Temperature proprietary sub-command.
pub const PROPRIETARY_CALIBRATE_TEMPERATURE: u8 = 42;
/// Analyzer labels for the proprietary sub-commands seen in reports.
pub const LABEL_CALIBRATE_DEPTH: &str = "Calibrate Depth";
pub const LABEL_CALIBRATE_SPEED: &str = "Calibrate Speed";
pub const LABEL_CALIBRATE_TEMPERATURE: &str = "Calibrate Temperature";

// ---------------------------------------------------------------------------
// Common parameter indexes
// ---------------------------------------------------------------------------

/// Manufacturer code parameter (first of the proprietary envelope).
pub const PARAM_MANUFACTURER: u8 = 1;
/// Industry group parameter.
pub const PARAM_INDUSTRY: u8 = 3;
/// Proprietary ID parameter within PGN 126720.
pub const PARAM_PROPRIETARY_ID: u8 = 4;
/// Curve point count parameter within Calibrate Speed.
pub const PARAM_POINT_COUNT: u8 = 5;
/// Offset parameter within PGN 128267.
pub const PARAM_DEPTH_OFFSET: u8 = 3;

// ---------------------------------------------------------------------------
// Command — calibration messages we send
// ---------------------------------------------------------------------------

/// A calibration command or request bound for the triducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetDepthOffset(depth::DepthOffsetSet),
    UnlockAccessLevel(access::AccessLevelUnlock),
    EnableSpeedPulseReporting(speed::SpeedPulseEnable),
    RequestStwCurve(speed::StwCurveRequest),
    SetStwCurve(speed::StwCurveSet),
    RestoreStwDefaults(speed::StwRestoreDefaults),
    RequestTemperatureOffset(temperature::TemperatureOffsetRequest),
    SetTemperatureOffset(temperature::TemperatureOffsetSet),
}

/// An encoded command, shaped for whichever emission channel it uses.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Structured(GroupFunctionCommand),
    Raw(RawMessage),
}

impl Command {
    /// Encode for transmission to the device at `dst`.
    ///
    /// Depth offset and curve writes go out structured (the host's
    /// transport packs their variable-length parameter lists); the
    /// fixed-layout operations go out as pre-rendered lines.
    pub fn encode(&self, dst: u8) -> Outbound {
        match self {
            Command::SetDepthOffset(m) => Outbound::Structured(m.to_group_function(dst)),
            Command::UnlockAccessLevel(m) => Outbound::Raw(m.to_raw(dst)),
            Command::EnableSpeedPulseReporting(m) => Outbound::Raw(m.to_raw(dst)),
            Command::RequestStwCurve(m) => Outbound::Raw(m.to_raw(dst)),
            Command::SetStwCurve(m) => Outbound::Structured(m.to_group_function(dst)),
            Command::RestoreStwDefaults(m) => Outbound::Raw(m.to_raw(dst)),
            Command::RequestTemperatureOffset(m) => Outbound::Raw(m.to_raw(dst)),
            Command::SetTemperatureOffset(m) => Outbound::Raw(m.to_raw(dst)),
        }
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Command::SetDepthOffset(_) => "set depth offset",
            Command::UnlockAccessLevel(_) => "unlock access level",
            Command::EnableSpeedPulseReporting(_) => "enable speed pulse reporting",
            Command::RequestStwCurve(_) => "request STW calibration curve",
            Command::SetStwCurve(_) => "set STW calibration curve",
            Command::RestoreStwDefaults(_) => "restore STW factory defaults",
            Command::RequestTemperatureOffset(_) => "request temperature offset",
            Command::SetTemperatureOffset(_) => "set temperature offset",
        }
    }
}

// ---------------------------------------------------------------------------
// Event — inbound messages we recognize
// ---------------------------------------------------------------------------

/// An inbound bus message this client acts on.
///
/// Covers solicited read-backs (depth offset, stored curve), the pulse
/// count broadcast, and diagnostic captures (acknowledgements, depth and
/// temperature calibration reports).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    WaterDepth(depth::WaterDepthReport),
    SpeedPulse(speed::SpeedPulseReport),
    Acknowledge(ack::Acknowledgement),
    StwCurve(speed::StwCurveReport),
    DepthCalibration(depth::DepthCalibrationReport),
    TemperatureCalibration(temperature::TemperatureCalibrationReport),
}

impl Event {
    /// Classify one inbound message. `Ok(None)` means the message is not
    /// ours — an unrelated PGN, another manufacturer's proprietary traffic,
    /// or a group function we do not track.
    pub fn decode(msg: &InboundMessage) -> Result<Option<Self>> {
        match msg.pgn {
            PGN_WATER_DEPTH => Ok(Some(Event::WaterDepth(depth::WaterDepthReport::decode(
                msg,
            )?))),
            PGN_SPEED_PULSE => Ok(Some(Event::SpeedPulse(speed::SpeedPulseReport::decode(
                msg,
            )?))),
            PGN_GROUP_FUNCTION => {
                if !msg.str_field_is(
                    "Function Code",
                    group_function::FunctionCode::Acknowledge.label(),
                ) {
                    return Ok(None);
                }
                Ok(ack::Acknowledgement::capture(msg).map(Event::Acknowledge))
            }
            PGN_AIRMAR_PROPRIETARY => {
                if !msg.str_field_is("Manufacturer Code", MANUFACTURER_LABEL)
                    || !msg.str_field_is("Industry Code", INDUSTRY_LABEL)
                {
                    return Ok(None);
                }
                match msg.field("Proprietary ID").and_then(serde_json::Value::as_str) {
                    Some(LABEL_CALIBRATE_SPEED) => Ok(Some(Event::StwCurve(
                        speed::StwCurveReport::decode(msg)?,
                    ))),
                    Some(LABEL_CALIBRATE_DEPTH) => Ok(Some(Event::DepthCalibration(
                        depth::DepthCalibrationReport::capture(msg),
                    ))),
                    Some(LABEL_CALIBRATE_TEMPERATURE) => Ok(Some(Event::TemperatureCalibration(
                        temperature::TemperatureCalibrationReport::capture(msg),
                    ))),
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ignores_unrelated_pgns() {
        let msg = InboundMessage::parse(r#"{"pgn":127250,"src":1,"fields":{}}"#).unwrap();
        assert_eq!(Event::decode(&msg).unwrap(), None);
    }

    #[test]
    fn decode_ignores_other_manufacturers() {
        let msg = InboundMessage::parse(
            r#"{"pgn":126720,"src":35,"fields":{
                "Manufacturer Code":"Garmin","Industry Code":"Marine Industry",
                "Proprietary ID":"Calibrate Speed","list":[]}}"#,
        )
        .unwrap();
        assert_eq!(Event::decode(&msg).unwrap(), None);
    }

    #[test]
    fn decode_ignores_non_acknowledge_group_functions() {
        let msg = InboundMessage::parse(
            r#"{"pgn":126208,"src":35,"fields":{"Function Code":"Command","PGN":126720}}"#,
        )
        .unwrap();
        assert_eq!(Event::decode(&msg).unwrap(), None);
    }

    #[test]
    fn decode_classifies_calibration_reports() {
        let msg = InboundMessage::parse(
            r#"{"pgn":126720,"src":35,"fields":{
                "Manufacturer Code":"Airmar","Industry Code":"Marine Industry",
                "Proprietary ID":"Calibrate Temperature","Temperature instance":"Onboard"}}"#,
        )
        .unwrap();
        assert!(matches!(
            Event::decode(&msg).unwrap(),
            Some(Event::TemperatureCalibration(_))
        ));
    }

    #[test]
    fn decode_surfaces_field_errors() {
        // Right PGN, malformed payload: error, not silent skip.
        let msg = InboundMessage::parse(r#"{"pgn":65409,"src":35,"fields":{}}"#).unwrap();
        assert!(Event::decode(&msg).is_err());
    }

    #[test]
    fn every_command_encodes_to_its_channel() {
        use crate::curve::CalibrationCurve;

        let structured = [
            Command::SetDepthOffset(depth::DepthOffsetSet { meters: 0.3 }),
            Command::SetStwCurve(speed::StwCurveSet {
                curve: CalibrationCurve::parse("10 1").unwrap(),
            }),
        ];
        for cmd in structured {
            assert!(matches!(cmd.encode(35), Outbound::Structured(_)), "{cmd:?}");
        }

        let raw = [
            Command::UnlockAccessLevel(access::AccessLevelUnlock),
            Command::EnableSpeedPulseReporting(speed::SpeedPulseEnable {
                interval_seconds: 2.0,
            }),
            Command::RequestStwCurve(speed::StwCurveRequest),
            Command::RestoreStwDefaults(speed::StwRestoreDefaults),
            Command::RequestTemperatureOffset(temperature::TemperatureOffsetRequest),
            Command::SetTemperatureOffset(temperature::TemperatureOffsetSet { kelvin: 1.0 }),
        ];
        for cmd in raw {
            match cmd.encode(35) {
                Outbound::Raw(msg) => assert_eq!(msg.dst, 35),
                other => panic!("{cmd:?} encoded as {other:?}"),
            }
        }
    }
}
