//! Error types for port operations.

use embedded_hal::i2c::ErrorKind;

/// Which half of the protocol a bus error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Read,
    Write,
}

impl std::fmt::Display for BusOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusOp::Read => write!(f, "read"),
            BusOp::Write => write!(f, "write"),
        }
    }
}

/// Clock device errors. Never retried by the transport.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The bus driver reported a failure (no ACK, arbitration loss, ...).
    #[error("I2C {op} failed ({kind:?}): {detail}")]
    Bus {
        op: BusOp,
        kind: ErrorKind,
        detail: String,
    },

    /// The worker running the bus transaction died before finishing.
    #[error("Bus transaction aborted: {0}")]
    Aborted(String),
}

impl TransportError {
    /// Wrap a bus driver error, keeping its kind and debug text.
    pub fn bus<E: embedded_hal::i2c::Error>(op: BusOp, err: &E) -> Self {
        Self::Bus {
            op,
            kind: err.kind(),
            detail: format!("{err:?}"),
        }
    }

    pub fn aborted(message: impl ToString) -> Self {
        Self::Aborted(message.to_string())
    }

    /// True when the device did not acknowledge (absent or unpowered chip).
    pub fn is_no_ack(&self) -> bool {
        matches!(
            self,
            Self::Bus {
                kind: ErrorKind::NoAcknowledge(_),
                ..
            }
        )
    }
}
