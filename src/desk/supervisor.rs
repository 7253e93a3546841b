use crate::error::InvariantViolation;
use parking_lot::Mutex;
use tokio::sync::watch;

/// Counts students who got all the help they needed and broadcasts the
/// shutdown once the last one is done.
#[derive(Debug)]
pub struct Supervisor {
    expected: usize,
    finished: Mutex<usize>,
    shutdown: watch::Sender<bool>,
}

/// Receiving end of the shutdown broadcast.
#[derive(Clone, Debug)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Supervisor {
    pub fn new(expected: usize) -> Supervisor {
        let (shutdown, _) = watch::channel(false);
        Supervisor {
            expected,
            finished: Mutex::new(0),
            shutdown,
        }
    }

    pub fn finished(&self) -> usize {
        *self.finished.lock()
    }

    /// Returns `true` for the student that completes the run.
    pub fn student_finished(&self) -> Result<bool, InvariantViolation> {
        let mut finished = self.finished.lock();
        if *finished >= self.expected {
            return Err(InvariantViolation::TooManyFinished {
                expected: self.expected,
            });
        }
        *finished += 1;
        if *finished == self.expected {
            self.shutdown();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Stop every idle worker. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.shutdown.subscribe(),
        }
    }
}

impl Shutdown {
    /// Resolves once the shutdown has been broadcast.
    pub async fn triggered(&mut self) {
        // A dropped supervisor means the run is over as well.
        let _ = self.rx.wait_for(|&done| done).await;
    }
}
