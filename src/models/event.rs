use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state derived from the `lottery_executed` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    /// Accepting applications, lottery not yet drawn
    Open,
    /// Lottery drawn; terminal
    Closed,
}

/// Event model representing a ticketed occasion with fixed capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub venue: String,
    pub capacity: i32, // CHECK (capacity > 0)
    pub lottery_executed: bool,
    pub created_at: NaiveDateTime,
}

impl Event {
    /// Create a new, open Event
    pub fn new(title: String, artist: String, venue: String, capacity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            artist,
            venue,
            capacity,
            lottery_executed: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn state(&self) -> EventState {
        if self.lottery_executed {
            EventState::Closed
        } else {
            EventState::Open
        }
    }

    /// Check if the event still accepts applications
    pub fn is_open(&self) -> bool {
        self.state() == EventState::Open
    }

    /// Capacity as a seat count for the draw
    pub fn seats(&self) -> usize {
        usize::try_from(self.capacity).unwrap_or(0)
    }
}

/// Event joined with the number of applications it has received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub application_count: i64,
}

/// Fields required to register a new event
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub venue: String,
    pub capacity: i32,
}
