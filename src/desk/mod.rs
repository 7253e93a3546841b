pub use self::chairs::ChairPool;
pub use self::handoff::HandoffBuffer;
pub use self::supervisor::Supervisor;

mod chairs;
mod handoff;
mod supervisor;

use crate::config::Settings;
use crate::error::{InvariantViolation, Result};
use crate::events::{Event, EventSink};
use crate::model::{PriorityQueue, QueueEntry, SessionTicket, StudentId, StudentRecord, TutorId};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::trace;

/// State shared by every worker of a simulation.
///
/// Each group of fields has its own lock. Apart from leaf locks (handshakes,
/// event sinks), the only nesting is chairs then handoff buffer, taken by a
/// student sitting down. Events are emitted while holding the lock of the
/// state they report.
pub struct Desk {
    pub settings: Settings,
    students: Vec<StudentRecord>,
    pub chairs: ChairPool,
    pub handoff: HandoffBuffer,
    room: Mutex<WaitingRoom>,
    tally: Mutex<Tally>,
    /// One permit per student who sat down.
    arrivals: Semaphore,
    /// One permit per student put into the queue.
    work: Semaphore,
    pub supervisor: Supervisor,
    events: Arc<dyn EventSink>,
}

#[derive(Debug, Default)]
struct WaitingRoom {
    queue: PriorityQueue,
    waiting: usize,
    total_requests: usize,
    max_waiting: usize,
}

#[derive(Debug, Default)]
struct Tally {
    sessions_completed: usize,
    tutoring_now: usize,
    max_tutoring: usize,
    per_tutor: Vec<usize>,
}

/// Aggregate counters, read after every worker is gone.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Counters {
    pub total_requests: usize,
    pub sessions_completed: usize,
    pub sessions_per_tutor: Vec<usize>,
    pub rejections: usize,
    pub max_waiting: usize,
    pub max_tutoring: usize,
}

impl Desk {
    pub fn new(settings: Settings, events: Arc<dyn EventSink>) -> Desk {
        Desk {
            students: (1..=settings.students)
                .map(|id| StudentRecord::new(StudentId(id)))
                .collect(),
            chairs: ChairPool::new(settings.chairs),
            handoff: HandoffBuffer::new(settings.students),
            room: Mutex::new(WaitingRoom::default()),
            tally: Mutex::new(Tally {
                per_tutor: vec![0; settings.tutors],
                ..Tally::default()
            }),
            arrivals: Semaphore::new(0),
            work: Semaphore::new(0),
            supervisor: Supervisor::new(settings.students),
            events,
            settings,
        }
    }

    pub fn student(&self, StudentId(id): StudentId) -> &StudentRecord {
        &self.students[id - 1]
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn arrivals(&self) -> &Semaphore {
        &self.arrivals
    }

    pub fn work(&self) -> &Semaphore {
        &self.work
    }

    pub fn emit(&self, event: Event) {
        self.events.emit(event);
    }

    /// Sit down if a chair is free and register with the coordinator.
    ///
    /// Returns `None` when every chair is taken.
    pub fn take_seat(&self, student: StudentId) -> Result<Option<SessionTicket>> {
        let mut seating = self.chairs.lock();
        let Some(empty_chairs) = seating.try_take_seat() else {
            self.emit(Event::SeatRejected { student });
            return Ok(None);
        };
        let ticket = self.student(student).await_tutor()?;
        self.handoff.push(student)?;
        self.emit(Event::SeatTaken {
            student,
            empty_chairs,
        });
        drop(seating);
        self.arrivals.add_permits(1);
        Ok(Some(ticket))
    }

    /// Move every visible arrival into the queue, in arrival order, and
    /// return how many were moved.
    pub fn admit_arrivals(&self) -> Result<usize> {
        let arrivals = self.handoff.drain()?;
        if arrivals.is_empty() {
            return Ok(0);
        }
        let mut room = self.room.lock();
        for &student in &arrivals {
            let entry = self.student(student).snapshot();
            room.queue.insert(entry)?;
            room.waiting += 1;
            room.total_requests += 1;
            room.max_waiting = room.max_waiting.max(room.waiting);
            self.emit(Event::StudentEnqueued {
                student,
                priority: entry.helps_taken,
                waiting: room.waiting,
                total_requests: room.total_requests,
            });
        }
        trace!(batch = arrivals.len(), queued = room.queue.len(), "arrivals admitted");
        Ok(arrivals.len())
    }

    /// Take the most deserving waiting student out of the queue.
    pub fn claim_next(&self) -> Result<QueueEntry> {
        let mut room = self.room.lock();
        let entry = room.queue.remove_min()?;
        room.waiting -= 1;
        Ok(entry)
    }

    #[cfg(test)]
    pub fn queue_snapshot(&self) -> Vec<QueueEntry> {
        self.room.lock().queue.iter().copied().collect()
    }

    pub fn check_queue(&self) -> Result<(), InvariantViolation> {
        self.room.lock().queue.check_order()
    }

    /// Check that nothing is left behind once every worker has stopped.
    pub fn audit(&self) -> Result<(), InvariantViolation> {
        self.check_queue()?;
        let unsettled = |what: String| Err(InvariantViolation::Unsettled(what));
        let room = self.room.lock();
        if !room.queue.is_empty() || room.waiting != 0 {
            return unsettled(format!("{} students still queued", room.queue.len()));
        }
        drop(room);
        if self.handoff.pending() != 0 {
            return unsettled(format!("{} arrivals never admitted", self.handoff.pending()));
        }
        if self.chairs.available() != self.chairs.total() {
            return unsettled(format!(
                "{} of {} chairs still taken",
                self.chairs.total() - self.chairs.available(),
                self.chairs.total()
            ));
        }
        if self.tally.lock().tutoring_now != 0 {
            return unsettled("a session still in progress".to_owned());
        }
        if !self.supervisor.is_shut_down() || self.supervisor.finished() != self.students.len() {
            return unsettled(format!(
                "{} of {} students done",
                self.supervisor.finished(),
                self.students.len()
            ));
        }
        Ok(())
    }

    /// Hand the student over to the tutor and free its chair.
    pub fn start_session(&self, student: StudentId, tutor: TutorId) -> Result<()> {
        self.emit(Event::SessionAssigned { student, tutor });
        self.student(student).assign_tutor(tutor)?;
        {
            let mut seating = self.chairs.lock();
            let empty_chairs = seating.release_seat()?;
            self.emit(Event::SeatReleased {
                student,
                empty_chairs,
            });
        }
        let mut tally = self.tally.lock();
        tally.tutoring_now += 1;
        tally.max_tutoring = tally.max_tutoring.max(tally.tutoring_now);
        Ok(())
    }

    pub fn end_session(&self, student: StudentId, tutor: TutorId) {
        let mut tally = self.tally.lock();
        tally.sessions_completed += 1;
        tally.tutoring_now -= 1;
        tally.per_tutor[tutor.0 - 1] += 1;
        self.emit(Event::SessionCompleted {
            student,
            tutor,
            tutoring_now: tally.tutoring_now,
            total_sessions: tally.sessions_completed,
        });
    }

    pub fn student_finished(&self) -> Result<()> {
        if self.supervisor.student_finished()? {
            self.emit(Event::AllStudentsDone);
        }
        Ok(())
    }

    pub fn counters(&self) -> Counters {
        let (total_requests, max_waiting) = {
            let room = self.room.lock();
            (room.total_requests, room.max_waiting)
        };
        let rejections = self.chairs.rejected();
        let tally = self.tally.lock();
        Counters {
            total_requests,
            sessions_completed: tally.sessions_completed,
            sessions_per_tutor: tally.per_tutor.clone(),
            rejections,
            max_waiting,
            max_tutoring: tally.max_tutoring,
        }
    }
}
