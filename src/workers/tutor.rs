use crate::desk::Desk;
use crate::error::Result;
use crate::model::TutorId;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, instrument, trace};

/// Help the most deserving waiting student, one session at a time.
#[instrument(skip(desk))]
pub async fn tutor(desk: Arc<Desk>, id: TutorId) -> Result<()> {
    let mut shutdown = desk.supervisor.subscribe();
    let session = desk.settings.timing.session();
    let mut sessions = 0_usize;
    loop {
        tokio::select! {
            biased;
            () = shutdown.triggered() => break,
            permit = desk.work().acquire() => match permit {
                Ok(permit) => permit.forget(),
                Err(_) => break,
            },
        }
        let entry = desk.claim_next()?;
        trace!(student = %entry.student, priority = entry.helps_taken, "student claimed");
        desk.start_session(entry.student, id)?;
        sleep(session).await;
        desk.end_session(entry.student, id);
        sessions += 1;
    }
    debug!(sessions, "tutor stops");
    Ok(())
}
