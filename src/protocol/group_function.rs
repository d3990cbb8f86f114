//! Command Group Function (PGN 126208) message builders.
//!
//! Every calibration operation travels inside a group function that wraps a
//! proprietary PGN. Two serializations exist, matching the two emission
//! channels the host offers:
//!
//! - [`GroupFunctionCommand`] — a structured message the host serializes
//!   itself (parameter values are integers in wire units).
//! - [`RawMessage`] — a pre-rendered Actisense serial line with the data
//!   bytes as comma-joined lowercase hex pairs.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::codec::hex_field;
use crate::protocol::PGN_GROUP_FUNCTION;

/// Bus priority used for all outgoing calibration traffic.
pub const PRIORITY_COMMAND: u8 = 3;

/// "Leave priority unchanged" sentinel for the wrapped PGN's Priority field.
pub const PRIORITY_NO_CHANGE: u8 = 8;

/// Raw rendering of [`PRIORITY_NO_CHANGE`] (priority nibble plus reserved bits).
pub const RAW_PRIORITY_NO_CHANGE: &str = "f8";

/// "No change" sentinel for a request's transmission interval field.
pub const RAW_INTERVAL_NO_CHANGE: &str = "ff,ff,ff,ff";

/// "No change" sentinel for a request's transmission interval offset field.
pub const RAW_INTERVAL_OFFSET_NO_CHANGE: &str = "ff,ff";

// ---------------------------------------------------------------------------
// Function code
// ---------------------------------------------------------------------------

/// Group function code (first byte of PGN 126208).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FunctionCode {
    Request = 0,
    Command = 1,
    Acknowledge = 2,
}

impl FunctionCode {
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// The label the analyzer uses for this code in decoded field maps.
    pub fn label(self) -> &'static str {
        match self {
            Self::Request => "Request",
            Self::Command => "Command",
            Self::Acknowledge => "Acknowledge",
        }
    }
}

// ---------------------------------------------------------------------------
// Structured form
// ---------------------------------------------------------------------------

/// One commanded parameter: field index within the wrapped PGN plus its
/// value in wire units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub index: u8,
    pub value: i64,
}

/// A structured Command Group Function, handed to the host's structured
/// emission channel. Constructed per encode call and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFunctionCommand {
    /// Destination device address.
    pub dst: u8,
    /// Bus priority of the group function itself.
    pub priority: u8,
    pub function: FunctionCode,
    /// The wrapped (commanded) PGN.
    pub pgn: u32,
    /// Requested priority for the wrapped PGN; [`PRIORITY_NO_CHANGE`] here.
    pub priority_setting: u8,
    pub parameters: Vec<Parameter>,
}

impl GroupFunctionCommand {
    /// Start a Command-function message for `pgn` with no parameters yet.
    pub fn command(dst: u8, pgn: u32) -> Self {
        Self {
            dst,
            priority: PRIORITY_COMMAND,
            function: FunctionCode::Command,
            pgn,
            priority_setting: PRIORITY_NO_CHANGE,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, index: u8, value: i64) -> Self {
        self.parameters.push(Parameter { index, value });
        self
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Render in the canboat JSON shape most hosts feed to their NMEA 2000
    /// output plumbing.
    pub fn to_canboat_json(&self) -> serde_json::Value {
        let list: Vec<serde_json::Value> = self
            .parameters
            .iter()
            .map(|p| serde_json::json!({ "Parameter": p.index, "Value": p.value }))
            .collect();
        serde_json::json!({
            "pgn": PGN_GROUP_FUNCTION,
            "dst": self.dst,
            "prio": self.priority,
            "fields": {
                "Function Code": self.function.label(),
                "PGN": self.pgn,
                "Priority": self.priority_setting,
                "Number of Parameters": self.parameter_count(),
                "list": list,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Raw form
// ---------------------------------------------------------------------------

/// A pre-rendered group function for the host's raw emission channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    pub priority: u8,
    pub pgn: u32,
    pub dst: u8,
    /// Comma-joined hex byte pairs: function code, commanded PGN, then the
    /// operation-specific body.
    pub data: String,
}

impl RawMessage {
    /// Assemble a group function line body from its parts.
    pub fn group_function(dst: u8, parts: &[String]) -> Self {
        Self {
            priority: PRIORITY_COMMAND,
            pgn: PGN_GROUP_FUNCTION,
            dst,
            data: parts.join(","),
        }
    }

    /// Format as an Actisense serial line, timestamped now.
    ///
    /// Source address and data length are placeholders (`00`); the transport
    /// fills them in.
    pub fn to_line(&self) -> String {
        self.to_line_at(Utc::now())
    }

    pub fn to_line_at(&self, at: DateTime<Utc>) -> String {
        format!(
            "{},{},{},00,{},00,{}",
            at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.priority,
            self.pgn,
            self.dst,
            self.data,
        )
    }
}

// ---------------------------------------------------------------------------
// Raw body helpers
// ---------------------------------------------------------------------------

/// One byte as a lowercase hex pair.
pub fn byte_pair(b: u8) -> String {
    hex_field(f64::from(b), 2)
}

/// A PGN number as its 3-byte little-endian hex rendering.
pub fn pgn_le3(pgn: u32) -> String {
    format!(
        "{},{},{}",
        byte_pair((pgn & 0xFF) as u8),
        byte_pair(((pgn >> 8) & 0xFF) as u8),
        byte_pair(((pgn >> 16) & 0xFF) as u8),
    )
}
