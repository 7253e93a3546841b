use super::{StudentId, TutorId};
use crate::error::{Error, InvariantViolation, Result};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Single-use rendezvous between a waiting student and the tutor that
/// picks it from the queue.
///
/// The student arms it before announcing its arrival and waits on the
/// returned ticket; the tutor completes it exactly once.
#[derive(Debug, Default)]
pub struct Handshake {
    slot: Mutex<Option<oneshot::Sender<TutorId>>>,
}

#[derive(Debug)]
pub struct SessionTicket {
    student: StudentId,
    assigned: oneshot::Receiver<TutorId>,
}

impl Handshake {
    pub fn arm(&self, student: StudentId) -> Result<SessionTicket> {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|tx| !tx.is_closed()) {
            return Err(InvariantViolation::HandshakeArmedTwice { student }.into());
        }
        let (tx, assigned) = oneshot::channel();
        *slot = Some(tx);
        Ok(SessionTicket { student, assigned })
    }

    pub fn complete(&self, student: StudentId, tutor: TutorId) -> Result<()> {
        let tx = self
            .slot
            .lock()
            .take()
            .ok_or(InvariantViolation::HandshakeNotArmed { student })?;
        tx.send(tutor).map_err(|_| Error::Handshake { student })
    }
}

impl SessionTicket {
    /// Wait until a tutor claims the student.
    pub async fn assigned(self) -> Result<TutorId> {
        let student = self.student;
        self.assigned.await.map_err(|_| Error::Handshake { student })
    }
}
