use crate::model::{StudentId, TutorId};
#[cfg(test)]
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Something that happened at the help desk. Nothing in the simulation
/// depends on who observes these.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    SeatTaken {
        student: StudentId,
        empty_chairs: usize,
    },
    SeatRejected {
        student: StudentId,
    },
    StudentEnqueued {
        student: StudentId,
        priority: u32,
        waiting: usize,
        total_requests: usize,
    },
    SessionAssigned {
        student: StudentId,
        tutor: TutorId,
    },
    SeatReleased {
        student: StudentId,
        empty_chairs: usize,
    },
    SessionCompleted {
        student: StudentId,
        tutor: TutorId,
        tutoring_now: usize,
        total_sessions: usize,
    },
    HelpReceived {
        student: StudentId,
        tutor: TutorId,
        helps_taken: u32,
    },
    AllStudentsDone,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Reports events through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) {
        match event {
            Event::SeatTaken {
                student,
                empty_chairs,
            } => info!(
                target: "helpdesk::events",
                %student, empty_chairs,
                "S: Student {student} takes a seat. Empty chairs = {empty_chairs}"
            ),
            Event::SeatRejected { student } => info!(
                target: "helpdesk::events",
                %student,
                "S: Student {student} found no empty chair. Will try again later"
            ),
            Event::StudentEnqueued {
                student,
                priority,
                waiting,
                total_requests,
            } => info!(
                target: "helpdesk::events",
                %student, priority, waiting, total_requests,
                "C: Student {student} with priority P{priority} added to the queue. \
                 Waiting students now = {waiting}. Total requests = {total_requests}"
            ),
            Event::SessionAssigned { student, tutor } => info!(
                target: "helpdesk::events",
                %student, %tutor,
                "T: Tutor {tutor} picks student {student}"
            ),
            Event::SeatReleased {
                student,
                empty_chairs,
            } => info!(
                target: "helpdesk::events",
                %student, empty_chairs,
                "T: Student {student} leaves the waiting room. Empty chairs = {empty_chairs}"
            ),
            Event::SessionCompleted {
                student,
                tutor,
                tutoring_now,
                total_sessions,
            } => info!(
                target: "helpdesk::events",
                %student, %tutor, tutoring_now, total_sessions,
                "T: Student {student} tutored by tutor {tutor}. \
                 Students tutored now = {tutoring_now}. Total sessions tutored = {total_sessions}"
            ),
            Event::HelpReceived {
                student,
                tutor,
                helps_taken,
            } => info!(
                target: "helpdesk::events",
                %student, %tutor, helps_taken,
                "S: Student {student} received help from tutor {tutor}"
            ),
            Event::AllStudentsDone => info!(
                target: "helpdesk::events",
                "All students received the help they needed"
            ),
        }
    }
}

/// Keeps every event in emission order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

#[cfg(test)]
impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

#[cfg(test)]
impl EventSink for Recorder {
    fn emit(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Forwards every event to several sinks.
#[derive(Default)]
pub struct Tee {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Tee {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Tee {
        Tee { sinks }
    }
}

impl EventSink for Tee {
    fn emit(&self, event: Event) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tee_forwards_to_all() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let tee = Tee::new(vec![first.clone(), second.clone(), Arc::new(LogSink)]);
        tee.emit(Event::SeatRejected {
            student: StudentId(1),
        });
        tee.emit(Event::AllStudentsDone);
        assert_eq!(first.events(), second.events());
        assert_eq!(first.events().len(), 2);
        assert_eq!(first.events()[1], Event::AllStudentsDone);
    }
}
