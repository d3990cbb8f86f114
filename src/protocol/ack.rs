//! Acknowledge Group Function handling (PGN 126208, function code 2).
//!
//! The device acknowledges unlock, reporting, and calibration commands, but
//! this client does not synchronize on them — acknowledgements are captured
//! for diagnostics and otherwise ignored (the settle delay in
//! [`Session`](crate::session::Session) stands in for a handshake).

use crate::inbound::InboundMessage;
use crate::protocol::{PGN_ACCESS_LEVEL, PGN_AIRMAR_PROPRIETARY, PGN_SPEED_PULSE};

/// An acknowledgement for one of the PGNs this client commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    /// The PGN being acknowledged.
    pub commanded_pgn: u32,
    /// Pretty-printed analyzer JSON of the full message.
    pub raw: String,
}

impl Acknowledgement {
    /// Capture an acknowledgement when it concerns a PGN this client
    /// commands; `None` for acknowledgements of unrelated traffic.
    pub fn capture(msg: &InboundMessage) -> Option<Self> {
        let commanded_pgn = msg.commanded_pgn()?;
        match commanded_pgn {
            PGN_AIRMAR_PROPRIETARY | PGN_SPEED_PULSE | PGN_ACCESS_LEVEL => Some(Self {
                commanded_pgn,
                raw: serde_json::to_string_pretty(msg).unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ack_msg(pgn: u32) -> InboundMessage {
        InboundMessage::parse(&format!(
            r#"{{"pgn":126208,"src":35,"fields":{{"Function Code":"Acknowledge","PGN":{pgn}}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn captures_commanded_pgns() {
        for pgn in [126720u32, 65409, 65287] {
            let ack = Acknowledgement::capture(&ack_msg(pgn)).unwrap();
            assert_eq!(ack.commanded_pgn, pgn);
        }
    }

    #[test]
    fn ignores_unrelated_pgns() {
        assert!(Acknowledgement::capture(&ack_msg(127245)).is_none());
    }
}
