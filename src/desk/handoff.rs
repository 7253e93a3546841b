use crate::error::InvariantViolation;
use crate::model::StudentId;
use parking_lot::Mutex;

/// Arrival log between seated students and the coordinator.
///
/// Capacity equals the number of students: a student holds at most one
/// seat at a time, so unread arrivals can never exceed it.
#[derive(Debug)]
pub struct HandoffBuffer {
    ring: Mutex<Ring>,
}

#[derive(Debug)]
struct Ring {
    slots: Vec<Option<StudentId>>,
    write: usize,
    read: usize,
}

impl HandoffBuffer {
    pub fn new(capacity: usize) -> HandoffBuffer {
        HandoffBuffer {
            ring: Mutex::new(Ring {
                slots: vec![None; capacity],
                write: 0,
                read: 0,
            }),
        }
    }

    pub fn pending(&self) -> usize {
        let ring = self.ring.lock();
        ring.write - ring.read
    }

    pub fn push(&self, student: StudentId) -> Result<(), InvariantViolation> {
        let mut ring = self.ring.lock();
        let capacity = ring.slots.len();
        if ring.write - ring.read >= capacity {
            return Err(InvariantViolation::HandoffOverflow { capacity });
        }
        let slot = ring.write % capacity;
        ring.slots[slot] = Some(student);
        ring.write += 1;
        Ok(())
    }

    /// Take every arrival visible right now, oldest first.
    pub fn drain(&self) -> Result<Vec<StudentId>, InvariantViolation> {
        let mut ring = self.ring.lock();
        let capacity = ring.slots.len();
        let end = ring.write;
        let arrivals = (ring.read..end)
            .map(|position| {
                ring.slots[position % capacity]
                    .take()
                    .ok_or(InvariantViolation::HandoffLost { position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        ring.read = end;
        Ok(arrivals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_arrival_order() {
        let buffer = HandoffBuffer::new(3);
        buffer.push(StudentId(2)).unwrap();
        buffer.push(StudentId(1)).unwrap();
        assert_eq!(buffer.pending(), 2);
        assert_eq!(buffer.drain().unwrap(), vec![StudentId(2), StudentId(1)]);
        assert_eq!(buffer.pending(), 0);
        assert!(buffer.drain().unwrap().is_empty());
    }

    #[test]
    fn wraps_around() {
        let buffer = HandoffBuffer::new(2);
        for round in 0..5 {
            buffer.push(StudentId(round)).unwrap();
            buffer.push(StudentId(round + 10)).unwrap();
            assert_eq!(
                buffer.drain().unwrap(),
                vec![StudentId(round), StudentId(round + 10)]
            );
        }
    }

    #[test]
    fn detects_overflow() {
        let buffer = HandoffBuffer::new(2);
        buffer.push(StudentId(1)).unwrap();
        buffer.push(StudentId(2)).unwrap();
        assert_eq!(
            buffer.push(StudentId(3)),
            Err(InvariantViolation::HandoffOverflow { capacity: 2 })
        );
        assert_eq!(buffer.drain().unwrap(), vec![StudentId(1), StudentId(2)]);
    }

    #[test]
    fn missing_arrival_is_reported() {
        let buffer = HandoffBuffer::new(3);
        buffer.push(StudentId(1)).unwrap();
        buffer.push(StudentId(2)).unwrap();
        buffer.ring.lock().slots[1] = None;
        assert_eq!(
            buffer.drain(),
            Err(InvariantViolation::HandoffLost { position: 1 })
        );
    }
}
