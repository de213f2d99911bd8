use super::{LotteryStore, StoreResult, StoreTxn};
use crate::database::Database;
use crate::models::{Application, ApplicationStatus, Event, EventSummary, NewEvent};
use crate::repositories::{ApplicationRepository, EventRepository};
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// PostgreSQL-backed store
pub struct PgStore {
    database: Database,
    event_repo: EventRepository,
    application_repo: ApplicationRepository,
}

impl PgStore {
    pub fn new(database: Database) -> Self {
        let pool = database.pool().clone();
        Self {
            database,
            event_repo: EventRepository::new(pool.clone()),
            application_repo: ApplicationRepository::new(pool),
        }
    }
}

#[async_trait]
impl LotteryStore for PgStore {
    async fn list_events(&self) -> StoreResult<Vec<EventSummary>> {
        self.event_repo.list_summaries().await
    }

    async fn find_event(&self, event_id: Uuid) -> StoreResult<Option<EventSummary>> {
        self.event_repo.find_summary(event_id).await
    }

    async fn insert_event(&self, new_event: &NewEvent) -> StoreResult<Event> {
        self.event_repo.create(new_event).await
    }

    async fn count_events(&self) -> StoreResult<i64> {
        self.event_repo.count().await
    }

    async fn list_applications(
        &self,
        event_id: Uuid,
        name_filter: Option<&str>,
    ) -> StoreResult<Vec<Application>> {
        self.application_repo.find_by_event(event_id, name_filter).await
    }

    async fn applications_by_status(
        &self,
        event_id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<Application>> {
        self.application_repo.find_by_status(event_id, status).await
    }

    async fn begin(&self) -> StoreResult<Box<dyn StoreTxn>> {
        let tx = self.database.pool().begin().await?;
        Ok(Box::new(PgStoreTxn { tx }))
    }
}

/// Wraps a sqlx transaction, which rolls back when dropped uncommitted
pub struct PgStoreTxn {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTxn for PgStoreTxn {
    async fn lock_event(&mut self, event_id: Uuid) -> StoreResult<Option<Event>> {
        EventRepository::lock_for_update(&mut self.tx, event_id).await
    }

    async fn pending_applications(&mut self, event_id: Uuid) -> StoreResult<Vec<Application>> {
        ApplicationRepository::find_pending(&mut self.tx, event_id).await
    }

    async fn insert_application(
        &mut self,
        event_id: Uuid,
        name: &str,
        email: &str,
    ) -> StoreResult<Application> {
        ApplicationRepository::create(&mut self.tx, event_id, name, email).await
    }

    async fn set_status(
        &mut self,
        application_ids: &[Uuid],
        status: ApplicationStatus,
    ) -> StoreResult<u64> {
        ApplicationRepository::update_status(&mut self.tx, application_ids, status).await
    }

    async fn mark_executed(&mut self, event_id: Uuid) -> StoreResult<bool> {
        EventRepository::mark_executed(&mut self.tx, event_id).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
