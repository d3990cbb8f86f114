//! Speed-through-water calibration curve.
//!
//! The device holds a piecewise-linear STW curve as ordered pairs of pulse
//! frequency (Hz) and boat speed (m/s). The host UI edits the curve as text,
//! one space-delimited pair per row; this module converts between that text
//! and typed points. Point order is preserved exactly as given — the device
//! firmware defines interpolation over the points as transmitted.

use std::fmt;

use crate::error::{CalibrationError, Result};

/// One point of the STW calibration curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Paddlewheel pulse frequency (Hz)
    pub frequency: f64,
    /// Speed through water (m/s)
    pub speed: f64,
}

/// An ordered STW calibration curve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalibrationCurve {
    points: Vec<CurvePoint>,
}

impl CalibrationCurve {
    pub fn new(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    /// Parse curve text: one row per point, exactly two whitespace-separated
    /// numeric tokens per row.
    ///
    /// Any malformed row fails the whole parse — a partial curve must never
    /// reach the device.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CalibrationError::CurveEmpty);
        }
        let mut points = Vec::new();
        for line in trimmed.split('\n') {
            let line = line.trim();
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 2 {
                return Err(CalibrationError::CurveLineFormat { line: line.to_string() });
            }
            let mut values = [0.0f64; 2];
            for (slot, token) in values.iter_mut().zip(&tokens) {
                *slot = token.parse().map_err(|_| CalibrationError::CurveNumberFormat {
                    token: token.to_string(),
                    line: line.to_string(),
                })?;
            }
            points.push(CurvePoint {
                frequency: values[0],
                speed: values[1],
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Render as curve text: `"{frequency} {speed}"` rows, newline-joined.
/// Inverse of [`CalibrationCurve::parse`].
impl fmt::Display for CalibrationCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {}", p.frequency, p.speed)?;
        }
        Ok(())
    }
}
