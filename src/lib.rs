//! Lottery Backend Library
//!
//! Events with limited capacity, public applications, and a one-shot random
//! lottery that partitions applicants into winners and losers.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod lottery;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use services::{ApplicationService, EventService, LotteryService};
use std::sync::Arc;
use store::LotteryStore;

/// Application state shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LotteryStore>,
    pub event_service: Arc<EventService>,
    pub application_service: Arc<ApplicationService>,
    pub lottery_service: Arc<LotteryService>,
}

impl AppState {
    /// Create a new AppState with services bound to the given store
    pub fn new(store: Arc<dyn LotteryStore>) -> Self {
        Self {
            event_service: Arc::new(EventService::new(store.clone())),
            application_service: Arc::new(ApplicationService::new(store.clone())),
            lottery_service: Arc::new(LotteryService::new(store.clone())),
            store,
        }
    }
}
