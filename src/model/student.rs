use super::{Handshake, QueueEntry, SessionTicket};
use crate::error::Result;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StudentId(pub usize);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TutorId(pub usize);

impl fmt::Display for TutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A student, alive for the whole simulation.
///
/// `helps_taken` is only ever written by the student's own worker; others
/// read it to build queue snapshots.
#[derive(Debug)]
pub struct StudentRecord {
    pub id: StudentId,
    helps_taken: AtomicU32,
    handshake: Handshake,
}

impl StudentRecord {
    pub fn new(id: StudentId) -> StudentRecord {
        StudentRecord {
            id,
            helps_taken: AtomicU32::new(0),
            handshake: Handshake::default(),
        }
    }

    pub fn helps_taken(&self) -> u32 {
        self.helps_taken.load(Ordering::Acquire)
    }

    /// Record one more completed session and return the new count.
    pub fn record_help(&self) -> u32 {
        self.helps_taken.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Freeze the current priority for insertion into the queue.
    pub fn snapshot(&self) -> QueueEntry {
        QueueEntry {
            student: self.id,
            helps_taken: self.helps_taken(),
        }
    }

    pub fn await_tutor(&self) -> Result<SessionTicket> {
        self.handshake.arm(self.id)
    }

    pub fn assign_tutor(&self, tutor: TutorId) -> Result<()> {
        self.handshake.complete(self.id, tutor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_freezes_priority() {
        let record = StudentRecord::new(StudentId(4));
        let before = record.snapshot();
        assert_eq!(record.record_help(), 1);
        assert_eq!(record.record_help(), 2);
        assert_eq!(before.helps_taken, 0);
        assert_eq!(record.snapshot().helps_taken, 2);
        assert_eq!(record.snapshot().student, StudentId(4));
    }
}
