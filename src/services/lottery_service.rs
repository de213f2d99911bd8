use crate::error::{lottery_error, AppError, AppResult};
use crate::lottery::select_winners;
use crate::models::{ApplicationStatus, LotteryOutcome};
use crate::store::LotteryStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Runs the one-shot lottery for an event
pub struct LotteryService {
    store: Arc<dyn LotteryStore>,
}

impl LotteryService {
    pub fn new(store: Arc<dyn LotteryStore>) -> Self {
        Self { store }
    }

    /// Draw winners for an event using a freshly seeded generator
    pub async fn execute_lottery(&self, event_id: Uuid) -> AppResult<LotteryOutcome> {
        let mut rng = StdRng::from_entropy();
        self.execute_lottery_with(event_id, &mut rng).await
    }

    /// Draw winners for an event with the given random source
    ///
    /// The event lock, the pending snapshot, every status write and the
    /// executed flag all live in one transaction. Any early return drops the
    /// transaction, so nothing is written unless the whole draw commits.
    ///
    /// # Errors
    /// * `NotFound` - No such event
    /// * `AlreadyExecuted` - The lottery already ran (including a concurrent run that won the race)
    /// * `EmptyPool` - No pending applications
    pub async fn execute_lottery_with<R>(
        &self,
        event_id: Uuid,
        rng: &mut R,
    ) -> AppResult<LotteryOutcome>
    where
        R: Rng + Send + ?Sized,
    {
        info!("Lottery requested for event {}", event_id);

        let mut txn = self.store.begin().await?;

        let event = txn
            .lock_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

        if event.lottery_executed {
            warn!("Rejected lottery for event {}: already executed", event_id);
            return Err(AppError::AlreadyExecuted(event_id));
        }

        let pending: Vec<Uuid> = txn
            .pending_applications(event_id)
            .await?
            .into_iter()
            .map(|application| application.id)
            .collect();

        let draw = select_winners(pending, event.seats(), rng).map_err(|e| {
            warn!("Rejected lottery for event {}: {}", event_id, e);
            lottery_error(event_id, e)
        })?;

        let won = txn.set_status(&draw.winners, ApplicationStatus::Won).await?;
        let lost = txn.set_status(&draw.losers, ApplicationStatus::Lost).await?;
        if won + lost != draw.total() as u64 {
            return Err(AppError::Storage(format!(
                "Lottery for event {} updated {} of {} applications",
                event_id,
                won + lost,
                draw.total()
            )));
        }

        if !txn.mark_executed(event_id).await? {
            return Err(AppError::AlreadyExecuted(event_id));
        }

        txn.commit().await?;

        let outcome = LotteryOutcome {
            total: draw.total(),
            winners: draw.winners.len(),
            losers: draw.losers.len(),
        };

        info!(
            "Lottery committed for event {} ({}): {} considered, {} won, {} lost",
            event.title, event_id, outcome.total, outcome.winners, outcome.losers
        );

        Ok(outcome)
    }
}
