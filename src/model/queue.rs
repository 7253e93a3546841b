use super::StudentId;
use crate::error::InvariantViolation;
use std::collections::VecDeque;

/// A waiting student, with the priority it had when it entered the queue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QueueEntry {
    pub student: StudentId,
    pub helps_taken: u32,
}

/// Students waiting for a tutor, least helped first.
///
/// Students with the same number of sessions are served in the order they
/// were inserted.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    entries: VecDeque<QueueEntry>,
}

impl PriorityQueue {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, student: StudentId) -> bool {
        self.entries.iter().any(|e| e.student == student)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn insert(&mut self, entry: QueueEntry) -> Result<(), InvariantViolation> {
        if self.contains(entry.student) {
            return Err(InvariantViolation::DuplicateEntry {
                student: entry.student,
            });
        }
        // Goes behind every entry of the same or a higher priority.
        let position = self
            .entries
            .partition_point(|e| e.helps_taken <= entry.helps_taken);
        self.entries.insert(position, entry);
        Ok(())
    }

    pub fn remove_min(&mut self) -> Result<QueueEntry, InvariantViolation> {
        self.entries
            .pop_front()
            .ok_or(InvariantViolation::EmptyQueue)
    }

    pub fn check_order(&self) -> Result<(), InvariantViolation> {
        match self
            .iter()
            .zip(self.iter().skip(1))
            .position(|(a, b)| a.helps_taken > b.helps_taken)
        {
            Some(position) => Err(InvariantViolation::QueueOrder { position }),
            None => Ok(()),
        }
    }
}
