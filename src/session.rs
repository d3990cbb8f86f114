//! Start-up calibration sequence.
//!
//! Runs once when the host starts the plugin: each pending flag in
//! [`CalibrationState`] turns into one dispatched command, in a fixed
//! order. Dispatch is fire-and-forget — a flag is cleared and the state
//! persisted as soon as its command has been handed to the host, not when
//! the device answers. A precondition failure (no device address, no value,
//! malformed curve text) logs the error, leaves that flag set, and moves on
//! to the remaining operations.
//!
//! STW and temperature operations are gated behind the access-level unlock.
//! The device needs settling time after the unlock; the unlock
//! acknowledgement is not awaited — a fixed delay stands in for the
//! handshake.

use std::thread;
use std::time::Duration;

use log::{debug, error};

use crate::curve::CalibrationCurve;
use crate::error::{CalibrationError, Result};
use crate::host::Host;
use crate::protocol::access::AccessLevelUnlock;
use crate::protocol::depth::DepthOffsetSet;
use crate::protocol::speed::{SpeedPulseEnable, StwCurveRequest, StwCurveSet, StwRestoreDefaults};
use crate::protocol::temperature::{TemperatureOffsetRequest, TemperatureOffsetSet};
use crate::protocol::{Command, Outbound};
use crate::state::CalibrationState;

/// Settling delay after an access-level unlock.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// Drives the start-up sequence against one device.
#[derive(Debug, Clone)]
pub struct Session {
    /// Delay between the unlock command and the command that depends on it.
    pub settle: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
        }
    }
}

impl Session {
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    /// Dispatch every pending operation, in order: depth-offset commit,
    /// speed-pulse enable, STW curve request, STW restore-defaults, STW
    /// curve commit, temperature request, temperature commit.
    pub fn run_startup<H: Host>(&self, state: &mut CalibrationState, host: &mut H) {
        debug!("running start-up calibration sequence");

        if state.depth_offset.set_value
            && let Err(e) = self.commit_depth_offset(state, host)
        {
            error!("set depth offset: {e}");
        }

        if state.speed_pulse_count.enable
            && let Err(e) = self.enable_speed_pulse(state, host)
        {
            error!("enable speed pulse reporting: {e}");
        }

        if state.speed_through_water.request_value
            && let Err(e) = self.request_stw_curve(state, host)
        {
            error!("request STW calibration curve: {e}");
        }

        if state.speed_through_water.restore_defaults
            && let Err(e) = self.restore_stw_defaults(state, host)
        {
            error!("restore STW factory defaults: {e}");
        }

        if state.speed_through_water.set_value
            && let Err(e) = self.commit_stw_curve(state, host)
        {
            error!("set STW calibration curve: {e}");
        }

        if state.temperature_offset.request_value
            && let Err(e) = self.request_temperature_offset(state, host)
        {
            error!("request temperature offset: {e}");
        }

        if state.temperature_offset.set_value
            && let Err(e) = self.commit_temperature_offset(state, host)
        {
            error!("set temperature offset: {e}");
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    fn commit_depth_offset<H: Host>(&self, state: &mut CalibrationState, host: &mut H) -> Result<()> {
        let dst = require_instance(state)?;
        let meters = state
            .depth_offset
            .value
            .ok_or(CalibrationError::MissingValue { field: "depth offset" })?;
        send(host, &Command::SetDepthOffset(DepthOffsetSet { meters }), dst);
        state.depth_offset.set_value = false;
        host.save_options(state);
        Ok(())
    }

    fn enable_speed_pulse<H: Host>(&self, state: &mut CalibrationState, host: &mut H) -> Result<()> {
        let dst = require_instance(state)?;
        let cmd = Command::EnableSpeedPulseReporting(SpeedPulseEnable {
            interval_seconds: state.speed_pulse_count.interval,
        });
        send(host, &cmd, dst);
        // `enable` is a persistent setting: nothing to clear or persist.
        Ok(())
    }

    fn request_stw_curve<H: Host>(&self, state: &mut CalibrationState, host: &mut H) -> Result<()> {
        let dst = require_instance(state)?;
        self.unlock_and_settle(host, dst);
        send(host, &Command::RequestStwCurve(StwCurveRequest), dst);
        state.speed_through_water.request_value = false;
        host.save_options(state);
        Ok(())
    }

    fn restore_stw_defaults<H: Host>(&self, state: &mut CalibrationState, host: &mut H) -> Result<()> {
        let dst = require_instance(state)?;
        self.unlock_and_settle(host, dst);
        send(host, &Command::RestoreStwDefaults(StwRestoreDefaults), dst);
        state.speed_through_water.restore_defaults = false;
        host.save_options(state);
        Ok(())
    }

    fn commit_stw_curve<H: Host>(&self, state: &mut CalibrationState, host: &mut H) -> Result<()> {
        let dst = require_instance(state)?;
        // Parse before touching the bus: a malformed curve must abort the
        // whole operation, unlock included.
        let curve = CalibrationCurve::parse(&state.speed_through_water.value)?;
        self.unlock_and_settle(host, dst);
        send(host, &Command::SetStwCurve(StwCurveSet { curve }), dst);
        state.speed_through_water.set_value = false;
        host.save_options(state);
        Ok(())
    }

    fn request_temperature_offset<H: Host>(
        &self,
        state: &mut CalibrationState,
        host: &mut H,
    ) -> Result<()> {
        let dst = require_instance(state)?;
        self.unlock_and_settle(host, dst);
        send(
            host,
            &Command::RequestTemperatureOffset(TemperatureOffsetRequest),
            dst,
        );
        state.temperature_offset.request_value = false;
        host.save_options(state);
        Ok(())
    }

    fn commit_temperature_offset<H: Host>(
        &self,
        state: &mut CalibrationState,
        host: &mut H,
    ) -> Result<()> {
        let dst = require_instance(state)?;
        let kelvin = state
            .temperature_offset
            .value
            .ok_or(CalibrationError::MissingValue { field: "temperature offset" })?;
        self.unlock_and_settle(host, dst);
        send(host, &Command::SetTemperatureOffset(TemperatureOffsetSet { kelvin }), dst);
        state.temperature_offset.set_value = false;
        host.save_options(state);
        Ok(())
    }

    fn unlock_and_settle<H: Host>(&self, host: &mut H, dst: u8) {
        send(host, &Command::UnlockAccessLevel(AccessLevelUnlock), dst);
        thread::sleep(self.settle);
    }
}

/// The device address must be configured before anything is encoded.
fn require_instance(state: &CalibrationState) -> Result<u8> {
    state
        .instance
        .ok_or(CalibrationError::MissingDeviceAddress)
}

fn send<H: Host>(host: &mut H, cmd: &Command, dst: u8) {
    debug!("{} → address {dst}", cmd.label());
    match cmd.encode(dst) {
        Outbound::Structured(msg) => host.emit_structured(&msg),
        Outbound::Raw(msg) => host.emit_raw(&msg.to_line()),
    }
}
