use crate::error::{AppError, AppResult};
use crate::models::{ApplicationStatus, Event, EventSummary, LotteryResults, NewEvent};
use crate::store::LotteryStore;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service for managing events and reading their results
pub struct EventService {
    store: Arc<dyn LotteryStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn LotteryStore>) -> Self {
        Self { store }
    }

    /// Register a new, open event
    pub async fn create_event(&self, new_event: &NewEvent) -> AppResult<Event> {
        let missing: Vec<&str> = [
            ("title", new_event.title.as_str()),
            ("artist", new_event.artist.as_str()),
            ("venue", new_event.venue.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(AppError::missing_fields(&missing));
        }

        if new_event.capacity <= 0 {
            return Err(AppError::Validation(format!(
                "capacity must be a positive integer, got {}",
                new_event.capacity
            )));
        }

        let event = self.store.insert_event(new_event).await?;
        info!("Created event {} ({}) with capacity {}", event.title, event.id, event.capacity);
        Ok(event)
    }

    /// All events with application counts
    pub async fn list_events(&self) -> AppResult<Vec<EventSummary>> {
        Ok(self.store.list_events().await?)
    }

    /// One event with its application count
    pub async fn get_event(&self, event_id: Uuid) -> AppResult<EventSummary> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    /// Winners and losers of an executed lottery, each ordered by name
    pub async fn get_results(&self, event_id: Uuid) -> AppResult<LotteryResults> {
        let summary = self.get_event(event_id).await?;

        if !summary.event.lottery_executed {
            return Err(AppError::ResultsNotReady(event_id));
        }

        let winners = self
            .store
            .applications_by_status(event_id, ApplicationStatus::Won)
            .await?;
        let losers = self
            .store
            .applications_by_status(event_id, ApplicationStatus::Lost)
            .await?;

        Ok(LotteryResults {
            event: summary.event,
            winners,
            losers,
        })
    }
}
