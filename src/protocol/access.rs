//! Access level unlock (proprietary PGN 65287).
//!
//! STW and temperature calibration parameters reject writes until the
//! device has granted access level 1. The unlock is a commanded PGN 65287
//! with a fixed seed; the device needs a short settling time afterwards
//! before it honors dependent commands (see
//! [`Session`](crate::session::Session)).

use crate::codec::{uint16_le, uint32_le};
use crate::protocol::group_function::{
    FunctionCode, RAW_PRIORITY_NO_CHANGE, RawMessage, byte_pair, pgn_le3,
};
use crate::protocol::{
    INDUSTRY_GROUP, MANUFACTURER_CODE, PARAM_INDUSTRY, PARAM_MANUFACTURER, PGN_ACCESS_LEVEL,
};

/// Format code accepted by the DST800.
pub const ACCESS_FORMAT_CODE: u8 = 1;
/// The only access level this client requests.
pub const ACCESS_LEVEL: u8 = 1;
/// Fixed unlock seed.
pub const ACCESS_SEED: u32 = 0x1234_5678;

/// Unlock configuration access on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessLevelUnlock;

impl AccessLevelUnlock {
    pub fn to_raw(&self, dst: u8) -> RawMessage {
        RawMessage::group_function(
            dst,
            &[
                byte_pair(FunctionCode::Command.as_byte()),
                pgn_le3(PGN_ACCESS_LEVEL),
                RAW_PRIORITY_NO_CHANGE.to_string(),
                byte_pair(5), // parameter pair count
                byte_pair(PARAM_MANUFACTURER),
                uint16_le(f64::from(MANUFACTURER_CODE)),
                byte_pair(PARAM_INDUSTRY),
                byte_pair(INDUSTRY_GROUP),
                byte_pair(4), // Format Code
                byte_pair(ACCESS_FORMAT_CODE),
                byte_pair(5), // Access Level
                byte_pair(ACCESS_LEVEL),
                byte_pair(7), // Seed
                uint32_le(f64::from(ACCESS_SEED)),
            ],
        )
    }
}
