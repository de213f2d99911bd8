use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Won,
    Lost,
}

impl ApplicationStatus {
    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Won => "won",
            ApplicationStatus::Lost => "lost",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "won" => Ok(ApplicationStatus::Won),
            "lost" => Ok(ApplicationStatus::Lost),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// One person's request to attend an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String, // Stored as TEXT, use ApplicationStatus for type safety
    pub applied_at: NaiveDateTime,
}

impl Application {
    /// Create a new pending Application
    pub fn new(event_id: Uuid, name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name,
            email,
            status: ApplicationStatus::Pending.as_str().to_string(),
            applied_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Get status as an enum
    pub fn status_enum(&self) -> ApplicationStatus {
        self.status.parse().unwrap_or(ApplicationStatus::Pending)
    }

    pub fn is_pending(&self) -> bool {
        self.status_enum() == ApplicationStatus::Pending
    }
}
