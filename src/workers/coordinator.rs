use crate::desk::Desk;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Move seated students into the priority queue and wake up as many
/// tutors as students were queued.
#[instrument(skip(desk))]
pub async fn coordinator(desk: Arc<Desk>) -> Result<()> {
    let mut shutdown = desk.supervisor.subscribe();
    let mut batches = 0_usize;
    loop {
        tokio::select! {
            biased;
            () = shutdown.triggered() => break,
            permit = desk.arrivals().acquire() => match permit {
                Ok(permit) => permit.forget(),
                Err(_) => break,
            },
        }
        // Students who arrived since the last wake-up were already drained.
        let admitted = desk.admit_arrivals()?;
        if admitted == 0 {
            trace!("nothing left to admit");
            continue;
        }
        batches += 1;
        desk.work().add_permits(admitted);
    }
    debug!(batches, "coordinator stops");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, Timing};
    use crate::events::Recorder;
    use crate::model::StudentId;
    use std::time::Duration;
    use tokio::time::sleep;

    fn desk() -> Arc<Desk> {
        let settings = Settings {
            students: 3,
            tutors: 1,
            chairs: 3,
            helps: 1,
            timing: Timing::default(),
        };
        Arc::new(Desk::new(settings, Arc::new(Recorder::default())))
    }

    #[tokio::test(start_paused = true)]
    async fn one_permit_per_queued_student() {
        let desk = desk();
        let worker = tokio::spawn(coordinator(desk.clone()));
        let _first = desk.take_seat(StudentId(3)).unwrap().unwrap();
        let _second = desk.take_seat(StudentId(1)).unwrap().unwrap();
        sleep(Duration::from_millis(1)).await;
        let _third = desk.take_seat(StudentId(2)).unwrap().unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(desk.work().available_permits(), 3);
        assert_eq!(desk.arrivals().available_permits(), 0);
        let queued = desk
            .queue_snapshot()
            .iter()
            .map(|e| e.student)
            .collect::<Vec<_>>();
        assert_eq!(queued, vec![StudentId(3), StudentId(1), StudentId(2)]);
        desk.supervisor.shutdown();
        worker.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown() {
        let desk = desk();
        let worker = tokio::spawn(coordinator(desk.clone()));
        sleep(Duration::from_millis(5)).await;
        assert!(!worker.is_finished());
        desk.supervisor.shutdown();
        worker.await.unwrap().unwrap();
    }
}
