pub mod codec;
pub mod curve;
pub mod error;
pub mod host;
pub mod inbound;
pub mod protocol;
pub mod reconcile;
pub mod session;
pub mod state;

pub use curve::{CalibrationCurve, CurvePoint};
pub use error::CalibrationError;
pub use host::{Host, PULSE_RATE_PATH};
pub use inbound::InboundMessage;
pub use protocol::{Command, Event, Outbound};
pub use reconcile::{Diagnostics, handle_inbound};
pub use session::{DEFAULT_SETTLE, Session};
pub use state::CalibrationState;
