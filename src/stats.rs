use crate::events::{Event, EventSink};
use parking_lot::Mutex;

/// Tallies the events shown in the final summary as they happen.
///
/// The rejection table has one slot per student and the histogram one slot
/// per priority reached, however long the run lasts.
#[derive(Debug)]
pub struct Summary {
    priorities: Mutex<Vec<usize>>,
    rejections: Mutex<Vec<usize>>,
}

impl Summary {
    pub fn new(students: usize) -> Summary {
        Summary {
            priorities: Mutex::new(Vec::new()),
            rejections: Mutex::new(vec![0; students]),
        }
    }

    /// Number of students queued at each priority.
    pub fn priority_histogram(&self) -> Vec<usize> {
        self.priorities.lock().clone()
    }

    /// Number of times each student found no free chair, indexed by student.
    pub fn rejections_per_student(&self) -> Vec<usize> {
        self.rejections.lock().clone()
    }
}

impl EventSink for Summary {
    fn emit(&self, event: Event) {
        match event {
            Event::StudentEnqueued { priority, .. } => {
                let priority = priority as usize;
                let mut histogram = self.priorities.lock();
                if histogram.len() <= priority {
                    histogram.resize(priority + 1, 0);
                }
                histogram[priority] += 1;
            }
            Event::SeatRejected { student } => {
                if let Some(n) = self.rejections.lock().get_mut(student.0 - 1) {
                    *n += 1;
                }
            }
            _ => {}
        }
    }
}
