use crate::config::Settings;
use crate::desk::{Counters, Desk};
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::model::{StudentId, TutorId};
use crate::workers;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info, instrument};

pub struct Simulation {
    settings: Settings,
    events: Arc<dyn EventSink>,
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct Report {
    pub settings: Settings,
    pub helps_taken: Vec<u32>,
    pub counters: Counters,
    pub elapsed: Duration,
}

impl Simulation {
    pub fn new(settings: Settings, events: Arc<dyn EventSink>) -> Simulation {
        Simulation { settings, events }
    }

    /// Run every worker to completion. The first failing worker stops the
    /// whole simulation.
    #[instrument(skip_all, fields(
        students = self.settings.students,
        tutors = self.settings.tutors,
        chairs = self.settings.chairs,
        helps = self.settings.helps,
    ))]
    pub async fn run(self) -> Result<Report> {
        let start = Instant::now();
        let settings = self.settings.clone();
        let desk = Arc::new(Desk::new(self.settings, self.events));
        let mut tasks = JoinSet::new();
        tasks.spawn(workers::coordinator(desk.clone()));
        for id in 1..=settings.tutors {
            tasks.spawn(workers::tutor(desk.clone(), TutorId(id)));
        }
        for id in 1..=settings.students {
            tasks.spawn(workers::student(
                desk.clone(),
                StudentId(id),
                student_rng(settings.timing.seed, id),
            ));
        }
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| Error::Worker {
                    reason: e.to_string(),
                })
                .and_then(|r| r);
            if let Err(e) = outcome {
                error!(error = %e, "stopping the simulation");
                desk.supervisor.shutdown();
                tasks.shutdown().await;
                return Err(e);
            }
        }
        desk.audit()?;
        let report = Report {
            helps_taken: desk.students().iter().map(|s| s.helps_taken()).collect(),
            counters: desk.counters(),
            elapsed: start.elapsed(),
            settings,
        };
        info!(
            sessions = report.counters.sessions_completed,
            elapsed = ?report.elapsed,
            "simulation complete"
        );
        Ok(report)
    }
}

fn student_rng(seed: Option<u64>, id: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
        None => StdRng::from_os_rng(),
    }
}
