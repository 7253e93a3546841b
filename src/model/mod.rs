pub use self::handshake::{Handshake, SessionTicket};
pub use self::queue::{PriorityQueue, QueueEntry};
pub use self::student::{StudentId, StudentRecord, TutorId};

mod handshake;
mod queue;
mod student;
