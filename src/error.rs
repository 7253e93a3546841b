use crate::model::StudentId;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a simulation can fail.
///
/// Rejected seat requests are not errors: students simply try again later.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("student {student} lost its tutor before the session could start")]
    Handshake { student: StudentId },

    #[error("worker stopped abnormally: {reason}")]
    Worker { reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing value for {0}")]
    Missing(&'static str),

    #[error("{0} must be positive")]
    NotPositive(&'static str),

    #[error("students need {helps} sessions each but there is no chair to wait on")]
    NoChairs { helps: u32 },
}

/// A broken synchronization contract. Never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("releasing a seat would leave {available} empty chairs out of {total}")]
    ChairOverflow { available: usize, total: usize },

    #[error("a tutor was signaled but the queue is empty")]
    EmptyQueue,

    #[error("student {student} is already waiting in the queue")]
    DuplicateEntry { student: StudentId },

    #[error("queue is out of order at position {position}")]
    QueueOrder { position: usize },

    #[error("handoff buffer of capacity {capacity} is full")]
    HandoffOverflow { capacity: usize },

    #[error("handoff buffer lost the arrival written at position {position}")]
    HandoffLost { position: usize },

    #[error("student {student} asked for a session while still waiting for one")]
    HandshakeArmedTwice { student: StudentId },

    #[error("student {student} was assigned a tutor without waiting for one")]
    HandshakeNotArmed { student: StudentId },

    #[error("more than the {expected} expected students finished")]
    TooManyFinished { expected: usize },

    #[error("simulation ended with {0}")]
    Unsettled(String),
}
