use crate::desk::Desk;
use crate::error::Result;
use crate::events::Event;
use crate::model::StudentId;
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, trace};

/// Work alone, look for a chair, get helped, and start over until the
/// required number of sessions has been reached.
#[instrument(skip(desk, rng))]
pub async fn student(desk: Arc<Desk>, id: StudentId, mut rng: StdRng) -> Result<()> {
    let record = desk.student(id);
    let timing = &desk.settings.timing;
    let mut attempts = 0_usize;
    while record.helps_taken() < desk.settings.helps {
        sleep(think_time(&mut rng, timing.max_think_us)).await;
        attempts += 1;
        let Some(ticket) = desk.take_seat(id)? else {
            continue;
        };
        let tutor = ticket.assigned().await?;
        trace!(%tutor, "session starts");
        sleep(timing.session()).await;
        let helps_taken = record.record_help();
        desk.emit(Event::HelpReceived {
            student: id,
            tutor,
            helps_taken,
        });
    }
    debug!(attempts, helps_taken = record.helps_taken(), "no more help needed");
    desk.student_finished()
}

fn think_time(rng: &mut StdRng, max_us: u64) -> Duration {
    if max_us == 0 {
        Duration::ZERO
    } else {
        Duration::from_micros(rng.random_range(0..max_us))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, Timing};
    use crate::events::Recorder;
    use crate::model::TutorId;
    use rand::SeedableRng;

    fn desk(helps: u32, chairs: usize) -> (Arc<Desk>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let settings = Settings {
            students: 1,
            tutors: 1,
            chairs,
            helps,
            timing: Timing::default(),
        };
        (Arc::new(Desk::new(settings, recorder.clone())), recorder)
    }

    #[test]
    fn think_time_is_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(think_time(&mut rng, 0), Duration::ZERO);
        for _ in 0..100 {
            assert!(think_time(&mut rng, 2000) < Duration::from_micros(2000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_to_do() {
        let (desk, recorder) = desk(0, 1);
        student(desk.clone(), StudentId(1), StdRng::seed_from_u64(0))
            .await
            .unwrap();
        assert!(desk.supervisor.is_shut_down());
        assert_eq!(recorder.events(), vec![Event::AllStudentsDone]);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_its_tutor() {
        let (desk, recorder) = desk(2, 1);
        let worker = tokio::spawn(student(
            desk.clone(),
            StudentId(1),
            StdRng::seed_from_u64(3),
        ));
        for _ in 0..2 {
            desk.arrivals().acquire().await.unwrap().forget();
            assert_eq!(desk.admit_arrivals().unwrap(), 1);
            let entry = desk.claim_next().unwrap();
            desk.start_session(entry.student, TutorId(1)).unwrap();
            desk.end_session(entry.student, TutorId(1));
        }
        worker.await.unwrap().unwrap();
        assert_eq!(desk.student(StudentId(1)).helps_taken(), 2);
        let helped = recorder
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::HelpReceived { .. }))
            .count();
        assert_eq!(helped, 2);
        assert!(desk.supervisor.is_shut_down());
    }
}
