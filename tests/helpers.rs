use lottery_backend::models::*;
use lottery_backend::store::{LotteryStore, MemoryStore, PgStore};
use lottery_backend::database::Database;
use lottery_backend::AppState;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Application wired to an in-memory store
pub struct TestApp {
    pub store: Arc<dyn LotteryStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn LotteryStore>) -> Self {
        Self {
            state: AppState::new(store.clone()),
            store,
        }
    }

    /// Create an open event with the given capacity
    pub async fn create_event(&self, title: &str, capacity: i32) -> Event {
        self.state
            .event_service
            .create_event(&concert(title, capacity))
            .await
            .expect("Failed to create event")
    }

    /// Submit one application per name
    pub async fn apply_all(&self, event_id: Uuid, names: &[&str]) -> Vec<Application> {
        let mut applications = Vec::new();
        for name in names {
            let email = format!("{}@example.com", name.to_lowercase());
            applications.push(
                self.state
                    .application_service
                    .submit_application(event_id, name, &email)
                    .await
                    .expect("Failed to submit application"),
            );
        }
        applications
    }

    /// Current roster keyed by applicant name
    pub async fn statuses(&self, event_id: Uuid) -> Vec<(String, ApplicationStatus)> {
        self.store
            .list_applications(event_id, None)
            .await
            .expect("Failed to list applications")
            .into_iter()
            .map(|a| {
                let status = a.status_enum();
                (a.name, status)
            })
            .collect()
    }

    pub async fn is_executed(&self, event_id: Uuid) -> bool {
        self.store
            .find_event(event_id)
            .await
            .expect("Failed to load event")
            .expect("Event should exist")
            .event
            .lottery_executed
    }
}

/// Application wired to a PostgreSQL pool (from `#[sqlx::test]`)
pub struct TestDatabase {
    pub pool: PgPool,
    pub app: TestApp,
}

impl TestDatabase {
    pub async fn from_pool(pool: PgPool) -> Self {
        let store: Arc<dyn LotteryStore> = Arc::new(PgStore::new(Database::new(pool.clone())));
        Self {
            pool,
            app: TestApp::with_store(store),
        }
    }

    /// Clean up all test data
    pub async fn cleanup(&self) {
        sqlx::query("TRUNCATE TABLE applications, events CASCADE")
            .execute(&self.pool)
            .await
            .expect("Failed to cleanup test data");
    }
}

/// Event fixture
pub fn concert(title: &str, capacity: i32) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        artist: "Test Artist".to_string(),
        venue: "Test Venue".to_string(),
        capacity,
    }
}

/// Assert that results split the given names with the expected number of winners
pub fn assert_partition(results: &LotteryResults, names: &[&str], expected_winners: usize) {
    assert_eq!(results.winners.len(), expected_winners);
    assert_eq!(results.losers.len(), names.len() - expected_winners);

    let drawn: HashSet<&str> = results
        .winners
        .iter()
        .chain(results.losers.iter())
        .map(|a| a.name.as_str())
        .collect();
    let expected: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(drawn, expected);
    assert_eq!(
        drawn.len(),
        results.winners.len() + results.losers.len(),
        "an applicant appears on both sides"
    );

    assert!(results.winners.iter().all(|a| a.status_enum() == ApplicationStatus::Won));
    assert!(results.losers.iter().all(|a| a.status_enum() == ApplicationStatus::Lost));
}

/// Assert that a list of applications is ordered by name
pub fn assert_sorted_by_name(applications: &[Application]) {
    let names: Vec<&str> = applications.iter().map(|a| a.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}
