//! Store abstraction over the `events` and `applications` tables.
//!
//! Services only see [`LotteryStore`] and the transaction handles it hands
//! out. A [`StoreTxn`] must be committed explicitly; dropping it on any other
//! path discards its writes.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::RepositoryError;
use crate::models::{Application, ApplicationStatus, Event, EventSummary, NewEvent};
use async_trait::async_trait;
use uuid::Uuid;

/// Result type for store operations
pub type StoreResult<T> = Result<T, RepositoryError>;

/// Shared access to committed state plus transaction acquisition
#[async_trait]
pub trait LotteryStore: Send + Sync {
    /// All events with their application counts, oldest first
    async fn list_events(&self) -> StoreResult<Vec<EventSummary>>;

    /// One event with its application count
    async fn find_event(&self, event_id: Uuid) -> StoreResult<Option<EventSummary>>;

    async fn insert_event(&self, new_event: &NewEvent) -> StoreResult<Event>;

    async fn count_events(&self) -> StoreResult<i64>;

    /// Roster for an event by submission time, optionally filtered by a name substring
    async fn list_applications(
        &self,
        event_id: Uuid,
        name_filter: Option<&str>,
    ) -> StoreResult<Vec<Application>>;

    /// Applications in one status, ordered by applicant name
    async fn applications_by_status(
        &self,
        event_id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<Application>>;

    /// Open a transaction
    async fn begin(&self) -> StoreResult<Box<dyn StoreTxn>>;
}

/// A unit of work; writes become visible only after [`StoreTxn::commit`]
#[async_trait]
pub trait StoreTxn: Send {
    /// Read an event and hold its lock until the transaction ends
    async fn lock_event(&mut self, event_id: Uuid) -> StoreResult<Option<Event>>;

    async fn pending_applications(&mut self, event_id: Uuid) -> StoreResult<Vec<Application>>;

    async fn insert_application(
        &mut self,
        event_id: Uuid,
        name: &str,
        email: &str,
    ) -> StoreResult<Application>;

    /// Move pending applications to `status`, returning how many changed
    async fn set_status(
        &mut self,
        application_ids: &[Uuid],
        status: ApplicationStatus,
    ) -> StoreResult<u64>;

    /// Flip `lottery_executed` from false to true; false if it was already set
    async fn mark_executed(&mut self, event_id: Uuid) -> StoreResult<bool>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
