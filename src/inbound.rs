//! Inbound message envelope from the bus analyzer.
//!
//! The external transport decodes NMEA 2000 frames and hands this crate one
//! JSON object per message: numeric PGN, source address, and a field map
//! keyed by field name (numbers for numeric fields, strings for enumerated
//! fields, arrays of objects for parameter lists). [`InboundMessage`] wraps
//! that object and offers typed field access; classification into events
//! happens in [`protocol`](crate::protocol).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CalibrationError, Result};

/// One decoded bus message, as delivered by the analyzer feed.
///
/// Consumed once per delivery; never retained (diagnostic captures keep a
/// pretty-printed rendering, not the message).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub pgn: u32,
    #[serde(default)]
    pub src: u8,
    #[serde(default)]
    pub dst: u8,
    #[serde(default)]
    pub prio: u8,
    #[serde(default)]
    pub fields: Value,
}

impl InboundMessage {
    /// Parse an analyzer JSON line.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Raw field lookup. `None` when the field map has no such key.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A numeric field, required.
    pub fn f64_field(&self, name: &'static str) -> Result<f64> {
        match self.field(name) {
            Some(v) => v
                .as_f64()
                .ok_or_else(|| CalibrationError::bad_field(self.pgn, name, v)),
            None => Err(CalibrationError::missing_field(self.pgn, name)),
        }
    }

    /// An enumerated (string) field, required.
    pub fn str_field(&self, name: &'static str) -> Result<&str> {
        match self.field(name) {
            Some(v) => v
                .as_str()
                .ok_or_else(|| CalibrationError::bad_field(self.pgn, name, v)),
            None => Err(CalibrationError::missing_field(self.pgn, name)),
        }
    }

    /// A parameter-list field, required.
    pub fn list_field(&self, name: &'static str) -> Result<&Vec<Value>> {
        match self.field(name) {
            Some(v) => v
                .as_array()
                .ok_or_else(|| CalibrationError::bad_field(self.pgn, name, v)),
            None => Err(CalibrationError::missing_field(self.pgn, name)),
        }
    }

    /// True when an enumerated field is present and equals `expected`.
    /// Used for classification guards, where absence means "not ours".
    pub fn str_field_is(&self, name: &str, expected: &str) -> bool {
        self.field(name).and_then(Value::as_str) == Some(expected)
    }

    /// The numeric value of an embedded "PGN" field, if present.
    pub fn commanded_pgn(&self) -> Option<u32> {
        self.field("PGN").and_then(Value::as_u64).map(|v| v as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth_msg() -> InboundMessage {
        InboundMessage::parse(
            r#"{"pgn":128267,"src":35,"dst":255,"prio":3,
                "fields":{"Depth":4.2,"Offset":-1.5,"Range":"unknown"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_analyzer_json() {
        let msg = depth_msg();
        assert_eq!(msg.pgn, 128267);
        assert_eq!(msg.src, 35);
        assert_eq!(msg.f64_field("Offset").unwrap(), -1.5);
    }

    #[test]
    fn missing_field_is_an_error() {
        let msg = depth_msg();
        assert!(msg.f64_field("Duration of interval").is_err());
    }

    #[test]
    fn wrong_type_is_an_error() {
        let msg = depth_msg();
        assert!(msg.f64_field("Range").is_err());
        assert!(msg.str_field("Offset").is_err());
    }

    #[test]
    fn string_guard() {
        let msg = depth_msg();
        assert!(msg.str_field_is("Range", "unknown"));
        assert!(!msg.str_field_is("Range", "known"));
        assert!(!msg.str_field_is("Nope", "unknown"));
    }

    #[test]
    fn envelope_fields_default_when_absent() {
        let msg = InboundMessage::parse(r#"{"pgn":65409}"#).unwrap();
        assert_eq!(msg.src, 0);
        assert!(msg.field("anything").is_none());
    }
}
