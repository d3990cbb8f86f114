use thiserror::Error;

/// Errors arising from command encoding, curve parsing, and inbound
/// message classification.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("device address (instance) is not configured")]
    MissingDeviceAddress,

    #[error("no {field} value configured")]
    MissingValue { field: &'static str },

    #[error("must have exactly two values on a row: {line:?}")]
    CurveLineFormat { line: String },

    #[error("not a number: {token:?} on row {line:?}")]
    CurveNumberFormat { token: String, line: String },

    #[error("calibration curve text is empty")]
    CurveEmpty,

    #[error("PGN {pgn} message is missing field {field:?}{}", format_got(got))]
    MissingField {
        pgn: u32,
        field: &'static str,
        /// The value found under the field name, if any (wrong type).
        got: Option<serde_json::Value>,
    },
}

impl CalibrationError {
    /// Create a `MissingField` error for an absent field.
    pub(crate) fn missing_field(pgn: u32, field: &'static str) -> Self {
        Self::MissingField { pgn, field, got: None }
    }

    /// Create a `MissingField` error for a field present with the wrong type.
    pub(crate) fn bad_field(pgn: u32, field: &'static str, got: &serde_json::Value) -> Self {
        Self::MissingField { pgn, field, got: Some(got.clone()) }
    }
}

/// Format the unexpected value as a suffix like " (got true)" (empty if absent).
fn format_got(got: &Option<serde_json::Value>) -> String {
    match got {
        Some(v) => format!(" (got {v})"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
