use super::{LotteryStore, StoreResult, StoreTxn};
use crate::error::RepositoryError;
use crate::models::{Application, ApplicationStatus, Event, EventSummary, NewEvent};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    events: Vec<Event>,
    applications: Vec<Application>,
}

impl Tables {
    fn summary(&self, event: &Event) -> EventSummary {
        let application_count = self
            .applications
            .iter()
            .filter(|a| a.event_id == event.id)
            .count() as i64;

        EventSummary {
            event: event.clone(),
            application_count,
        }
    }
}

/// In-process store for development and tests
///
/// Transactions hold the store-wide lock from `begin` until they commit or
/// drop. Writes go straight to the tables and are recorded in an undo log
/// that is replayed if the transaction drops without committing.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LotteryStore for MemoryStore {
    async fn list_events(&self) -> StoreResult<Vec<EventSummary>> {
        let tables = self.tables.lock().await;
        let mut summaries: Vec<EventSummary> =
            tables.events.iter().map(|e| tables.summary(e)).collect();
        summaries.sort_by_key(|s| s.event.created_at);
        Ok(summaries)
    }

    async fn find_event(&self, event_id: Uuid) -> StoreResult<Option<EventSummary>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| tables.summary(e)))
    }

    async fn insert_event(&self, new_event: &NewEvent) -> StoreResult<Event> {
        if new_event.capacity <= 0 {
            return Err(RepositoryError::ConstraintViolation(
                "capacity must be positive".to_string(),
            ));
        }

        let event = Event::new(
            new_event.title.clone(),
            new_event.artist.clone(),
            new_event.venue.clone(),
            new_event.capacity,
        );
        self.tables.lock().await.events.push(event.clone());
        Ok(event)
    }

    async fn count_events(&self) -> StoreResult<i64> {
        Ok(self.tables.lock().await.events.len() as i64)
    }

    async fn list_applications(
        &self,
        event_id: Uuid,
        name_filter: Option<&str>,
    ) -> StoreResult<Vec<Application>> {
        let tables = self.tables.lock().await;
        let mut applications: Vec<Application> = tables
            .applications
            .iter()
            .filter(|a| a.event_id == event_id)
            .filter(|a| name_filter.map_or(true, |needle| a.name.contains(needle)))
            .cloned()
            .collect();
        applications.sort_by_key(|a| a.applied_at);
        Ok(applications)
    }

    async fn applications_by_status(
        &self,
        event_id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<Application>> {
        let tables = self.tables.lock().await;
        let mut applications: Vec<Application> = tables
            .applications
            .iter()
            .filter(|a| a.event_id == event_id && a.status_enum() == status)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.name.cmp(&b.name).then(a.applied_at.cmp(&b.applied_at)));
        Ok(applications)
    }

    async fn begin(&self) -> StoreResult<Box<dyn StoreTxn>> {
        let tables = self.tables.clone().lock_owned().await;
        let inserted_from = tables.applications.len();
        Ok(Box::new(MemoryTxn {
            tables,
            undo: UndoLog {
                inserted_from,
                ..UndoLog::default()
            },
        }))
    }
}

/// Writes to reverse on rollback
#[derive(Default)]
struct UndoLog {
    /// Applications at or past this index were inserted by the transaction
    inserted_from: usize,
    /// Previous status of each application index the transaction changed
    statuses: Vec<(usize, String)>,
    /// Event indexes whose executed flag the transaction set
    executed: Vec<usize>,
}

/// Transaction over a [`MemoryStore`]
pub struct MemoryTxn {
    tables: OwnedMutexGuard<Tables>,
    undo: UndoLog,
}

impl MemoryTxn {
    fn rollback(&mut self) {
        let undo = std::mem::take(&mut self.undo);
        for (index, status) in undo.statuses.into_iter().rev() {
            self.tables.applications[index].status = status;
        }
        for index in undo.executed {
            self.tables.events[index].lottery_executed = false;
        }
        self.tables.applications.truncate(undo.inserted_from);
    }
}

impl Drop for MemoryTxn {
    fn drop(&mut self) {
        self.rollback();
    }
}

#[async_trait]
impl StoreTxn for MemoryTxn {
    async fn lock_event(&mut self, event_id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.tables.events.iter().find(|e| e.id == event_id).cloned())
    }

    async fn pending_applications(&mut self, event_id: Uuid) -> StoreResult<Vec<Application>> {
        Ok(self
            .tables
            .applications
            .iter()
            .filter(|a| a.event_id == event_id && a.is_pending())
            .cloned()
            .collect())
    }

    async fn insert_application(
        &mut self,
        event_id: Uuid,
        name: &str,
        email: &str,
    ) -> StoreResult<Application> {
        if !self.tables.events.iter().any(|e| e.id == event_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "event {} does not exist",
                event_id
            )));
        }

        let application = Application::new(event_id, name.to_string(), email.to_string());
        self.tables.applications.push(application.clone());
        Ok(application)
    }

    async fn set_status(
        &mut self,
        application_ids: &[Uuid],
        status: ApplicationStatus,
    ) -> StoreResult<u64> {
        let mut updated = 0;
        for (index, application) in self.tables.applications.iter_mut().enumerate() {
            if application.is_pending() && application_ids.contains(&application.id) {
                let previous =
                    std::mem::replace(&mut application.status, status.as_str().to_string());
                self.undo.statuses.push((index, previous));
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn mark_executed(&mut self, event_id: Uuid) -> StoreResult<bool> {
        match self
            .tables
            .events
            .iter()
            .position(|e| e.id == event_id && !e.lottery_executed)
        {
            Some(index) => {
                self.tables.events[index].lottery_executed = true;
                self.undo.executed.push(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let mut txn = self;
        // Nothing left to reverse once committed
        txn.undo = UndoLog {
            inserted_from: txn.tables.applications.len(),
            ..UndoLog::default()
        };
        Ok(())
    }
}
