use crate::error::InvariantViolation;
use parking_lot::{Mutex, MutexGuard};

/// Waiting-room chairs. A chair is taken when a student sits down and
/// given back as soon as a tutor starts helping that student.
#[derive(Debug)]
pub struct ChairPool {
    total: usize,
    state: Mutex<ChairState>,
}

#[derive(Debug)]
struct ChairState {
    available: usize,
    rejected: usize,
}

/// Exclusive access to the chairs, held while a student registers its
/// arrival so that seating and registration happen atomically.
pub struct Seating<'a> {
    total: usize,
    state: MutexGuard<'a, ChairState>,
}

impl ChairPool {
    pub fn new(total: usize) -> ChairPool {
        ChairPool {
            total,
            state: Mutex::new(ChairState {
                available: total,
                rejected: 0,
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn available(&self) -> usize {
        self.state.lock().available
    }

    pub fn rejected(&self) -> usize {
        self.state.lock().rejected
    }

    pub fn lock(&self) -> Seating<'_> {
        Seating {
            total: self.total,
            state: self.state.lock(),
        }
    }
}

impl Seating<'_> {
    /// Take a chair if one is free and return the number of chairs left.
    pub fn try_take_seat(&mut self) -> Option<usize> {
        if self.state.available == 0 {
            self.state.rejected += 1;
            return None;
        }
        self.state.available -= 1;
        Some(self.state.available)
    }

    pub fn release_seat(&mut self) -> Result<usize, InvariantViolation> {
        if self.state.available >= self.total {
            return Err(InvariantViolation::ChairOverflow {
                available: self.state.available + 1,
                total: self.total,
            });
        }
        self.state.available += 1;
        Ok(self.state.available)
    }
}
