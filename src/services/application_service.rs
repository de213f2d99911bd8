use crate::error::{AppError, AppResult};
use crate::models::Application;
use crate::store::LotteryStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Intake and roster queries for event applications
pub struct ApplicationService {
    store: Arc<dyn LotteryStore>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn LotteryStore>) -> Self {
        Self { store }
    }

    /// Record an application while the event is still open
    ///
    /// The closed check and the insert share a transaction holding the event
    /// lock, so no application lands after a lottery has taken its snapshot.
    /// Repeat submissions from the same person are accepted as separate rows.
    pub async fn submit_application(
        &self,
        event_id: Uuid,
        name: &str,
        email: &str,
    ) -> AppResult<Application> {
        let mut txn = self.store.begin().await?;

        let event = txn
            .lock_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

        if !event.is_open() {
            warn!("Rejected late application for closed event {}", event_id);
            return Err(AppError::LotteryClosed(event_id));
        }

        let missing: Vec<&str> = [("name", name), ("email", email)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::missing_fields(&missing));
        }

        let application = txn.insert_application(event_id, name, email).await?;
        txn.commit().await?;

        info!("New application {} for event {}", application.id, event_id);
        Ok(application)
    }

    /// Applicant roster in submission order
    pub async fn list_applications(
        &self,
        event_id: Uuid,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Application>> {
        if self.store.find_event(event_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Event {} not found", event_id)));
        }

        let applications = self
            .store
            .list_applications(event_id, name_filter.filter(|f| !f.is_empty()))
            .await?;

        Ok(applications)
    }
}
