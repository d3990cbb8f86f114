//! Inbound reconciliation: fold recognized bus events into calibration
//! state.
//!
//! One message per call, no ordering assumptions — the device answers
//! requests asynchronously and interleaves them with its periodic
//! broadcasts. A malformed message is logged and dropped; it must never
//! take the listener down or affect the handling of later messages.

use log::{debug, warn};

use crate::host::Host;
use crate::inbound::InboundMessage;
use crate::protocol::Event;
use crate::state::CalibrationState;

/// Last-seen diagnostic captures, for display by the host UI.
///
/// These deliberately do not feed back into settable state fields: only the
/// STW curve read-back and the depth-offset capture write state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub last_acknowledgement: Option<String>,
    pub last_depth_calibration: Option<String>,
    pub last_temperature_calibration: Option<String>,
}

/// Handle one inbound bus message.
///
/// Decode or classification failures are contained here: logged at warn
/// level and discarded.
pub fn handle_inbound<H: Host>(
    state: &mut CalibrationState,
    diag: &mut Diagnostics,
    host: &mut H,
    msg: &InboundMessage,
) {
    match Event::decode(msg) {
        Ok(Some(event)) => apply(state, diag, host, event),
        Ok(None) => {}
        Err(e) => warn!("discarding PGN {} message from address {}: {e}", msg.pgn, msg.src),
    }
}

fn apply<H: Host>(
    state: &mut CalibrationState,
    diag: &mut Diagnostics,
    host: &mut H,
    event: Event,
) {
    match event {
        // Depth is broadcast continuously; while a read-back is pending the
        // first value wins and the stream is not re-read.
        Event::WaterDepth(report) => {
            if state.depth_offset.request_value {
                debug!("reading depth offset: {} m", report.offset);
                state.depth_offset.value = Some(report.offset);
                state.depth_offset.request_value = false;
                host.save_options(state);
            }
        }

        // Republished unconditionally, pending flags or not.
        Event::SpeedPulse(report) => {
            host.publish_pulse_rate(report.pulse_rate());
        }

        Event::Acknowledge(ack) => {
            debug!("acknowledge group function for PGN {}", ack.commanded_pgn);
            diag.last_acknowledgement = Some(ack.raw);
        }

        Event::StwCurve(report) => {
            debug!("received STW calibration curve ({} points)", report.curve.len());
            state.speed_through_water.value = report.curve.to_string();
            host.save_options(state);
        }

        Event::DepthCalibration(report) => {
            debug!("depth calibration report: {}", report.raw);
            diag.last_depth_calibration = Some(report.raw);
        }

        Event::TemperatureCalibration(report) => {
            debug!("temperature calibration report: {}", report.raw);
            diag.last_temperature_calibration = Some(report.raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;

    fn setup() -> (CalibrationState, Diagnostics, RecordingHost) {
        (
            CalibrationState::default(),
            Diagnostics::default(),
            RecordingHost::default(),
        )
    }

    fn depth_broadcast(offset: f64) -> InboundMessage {
        InboundMessage::parse(&format!(
            r#"{{"pgn":128267,"src":35,"fields":{{"Depth":5.0,"Offset":{offset}}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn depth_capture_is_first_value_wins() {
        let (mut state, mut diag, mut host) = setup();
        state.depth_offset.request_value = true;

        handle_inbound(&mut state, &mut diag, &mut host, &depth_broadcast(-0.6));
        assert_eq!(state.depth_offset.value, Some(-0.6));
        assert!(!state.depth_offset.request_value);
        assert_eq!(host.saved.len(), 1);

        // The stream keeps broadcasting; with the flag clear nothing changes.
        handle_inbound(&mut state, &mut diag, &mut host, &depth_broadcast(-0.9));
        assert_eq!(state.depth_offset.value, Some(-0.6));
        assert_eq!(host.saved.len(), 1);
    }

    #[test]
    fn depth_broadcast_without_pending_flag_is_ignored() {
        let (mut state, mut diag, mut host) = setup();
        handle_inbound(&mut state, &mut diag, &mut host, &depth_broadcast(-0.6));
        assert_eq!(state.depth_offset.value, None);
        assert!(host.saved.is_empty());
    }

    #[test]
    fn pulse_rate_is_always_published() {
        let (mut state, mut diag, mut host) = setup();
        let msg = InboundMessage::parse(
            r#"{"pgn":65409,"src":35,"fields":{
                "Number of pulses received":100,"Duration of interval":2.0}}"#,
        )
        .unwrap();
        handle_inbound(&mut state, &mut diag, &mut host, &msg);
        assert_eq!(host.pulse_rates, vec![50.0]);
        // No state mutation, no persistence.
        assert!(host.saved.is_empty());
    }

    #[test]
    fn stw_curve_readback_is_stored_and_persisted() {
        let (mut state, mut diag, mut host) = setup();
        let msg = InboundMessage::parse(
            r#"{"pgn":126720,"src":35,"fields":{
                "Manufacturer Code":"Airmar","Industry Code":"Marine Industry",
                "Proprietary ID":"Calibrate Speed",
                "list":[{"Input frequency":10.0,"Output speed":1.0},
                        {"Input frequency":20.0,"Output speed":2.0}]}}"#,
        )
        .unwrap();
        handle_inbound(&mut state, &mut diag, &mut host, &msg);
        assert_eq!(state.speed_through_water.value, "10 1\n20 2");
        assert_eq!(host.saved.len(), 1);
    }

    #[test]
    fn acknowledgements_do_not_mutate_state() {
        let (mut state, mut diag, mut host) = setup();
        let before = state.clone();
        let msg = InboundMessage::parse(
            r#"{"pgn":126208,"src":35,"fields":{"Function Code":"Acknowledge","PGN":65287}}"#,
        )
        .unwrap();
        handle_inbound(&mut state, &mut diag, &mut host, &msg);
        assert_eq!(state, before);
        assert!(host.saved.is_empty());
        assert!(diag.last_acknowledgement.is_some());
    }

    #[test]
    fn temperature_report_is_diagnostic_only() {
        let (mut state, mut diag, mut host) = setup();
        let msg = InboundMessage::parse(
            r#"{"pgn":126720,"src":35,"fields":{
                "Manufacturer Code":"Airmar","Industry Code":"Marine Industry",
                "Proprietary ID":"Calibrate Temperature","Temperature offset":1.5}}"#,
        )
        .unwrap();
        handle_inbound(&mut state, &mut diag, &mut host, &msg);
        assert!(diag.last_temperature_calibration.is_some());
        // The offset is not written back into settable state.
        assert_eq!(state.temperature_offset.value, None);
        assert!(host.saved.is_empty());
    }

    #[test]
    fn malformed_message_is_contained() {
        let (mut state, mut diag, mut host) = setup();
        // 65409 without its numeric fields fails to decode.
        let bad = InboundMessage::parse(r#"{"pgn":65409,"src":35,"fields":{}}"#).unwrap();
        handle_inbound(&mut state, &mut diag, &mut host, &bad);

        // The next message still lands.
        state.depth_offset.request_value = true;
        handle_inbound(&mut state, &mut diag, &mut host, &depth_broadcast(0.2));
        assert_eq!(state.depth_offset.value, Some(0.2));
    }
}
