//! The host collaborator seam.
//!
//! This crate never opens a bus connection or touches disk. The embedding
//! plugin host supplies both emission channels, the derived-signal sink,
//! and options persistence through one [`Host`] implementation. Every
//! method is fire-and-forget: no call confirms delivery, and none may
//! block beyond what the host's own plumbing requires.

use crate::protocol::group_function::GroupFunctionCommand;
use crate::state::CalibrationState;

/// Signal path for the derived paddlewheel pulse rate.
pub const PULSE_RATE_PATH: &str = "navigation.speedSensorPulseRate";

/// Services the embedding host provides to the calibration core.
pub trait Host {
    /// Emit a structured group function on the bus.
    fn emit_structured(&mut self, msg: &GroupFunctionCommand);

    /// Emit a pre-rendered Actisense serial line on the bus.
    fn emit_raw(&mut self, line: &str);

    /// Publish the derived pulse rate (pulses/second) under
    /// [`PULSE_RATE_PATH`].
    fn publish_pulse_rate(&mut self, pulses_per_second: f64);

    /// Persist the (just mutated) calibration state. Called after every
    /// state change, never batched; completion is the host's concern.
    fn save_options(&mut self, state: &CalibrationState);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records every host interaction for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub structured: Vec<GroupFunctionCommand>,
        pub raw: Vec<String>,
        pub pulse_rates: Vec<f64>,
        pub saved: Vec<CalibrationState>,
    }

    impl RecordingHost {
        pub fn emissions(&self) -> usize {
            self.structured.len() + self.raw.len()
        }
    }

    impl Host for RecordingHost {
        fn emit_structured(&mut self, msg: &GroupFunctionCommand) {
            self.structured.push(msg.clone());
        }

        fn emit_raw(&mut self, line: &str) {
            self.raw.push(line.to_string());
        }

        fn publish_pulse_rate(&mut self, pulses_per_second: f64) {
            self.pulse_rates.push(pulses_per_second);
        }

        fn save_options(&mut self, state: &CalibrationState) {
            self.saved.push(state.clone());
        }
    }
}
