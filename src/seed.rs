//! Demo data for local development.

use crate::error::AppResult;
use crate::models::NewEvent;
use crate::store::LotteryStore;
use tracing::info;

const DEMO_EVENTS: [(&str, &str, &str, i32); 5] = [
    ("YOASOBI ARENA TOUR 2026", "YOASOBI", "Tokyo Dome", 3),
    ("Official HIGE DANdism ONE-MAN LIVE", "Official HIGE DANdism", "Yokohama Arena", 4),
    ("Aimyon Acoustic Tour", "Aimyon", "Osaka-Jo Hall", 2),
    ("King Gnu Stadium Live", "King Gnu", "Nissan Stadium", 5),
    ("Mrs. GREEN APPLE FESTIVAL 2026", "Mrs. GREEN APPLE", "ZOZO Marine Stadium", 3),
];

const DEMO_APPLICANTS: [(&str, &str); 8] = [
    ("Taro Tanaka", "tanaka@example.com"),
    ("Hanako Sato", "sato@example.com"),
    ("Ichiro Suzuki", "suzuki@example.com"),
    ("Misaki Takahashi", "takahashi@example.com"),
    ("Kenta Ito", "ito@example.com"),
    ("Sakura Watanabe", "watanabe@example.com"),
    ("Daiki Yamamoto", "yamamoto@example.com"),
    ("Akari Nakamura", "nakamura@example.com"),
];

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub events: usize,
    pub applications: usize,
}

impl SeedReport {
    pub fn skipped(&self) -> bool {
        self.events == 0 && self.applications == 0
    }
}

/// Insert demo events and applicants unless the store already has events
///
/// The applicants all go to the first demo event, which is oversubscribed
/// so a lottery can be drawn straight away.
pub async fn seed_demo_data(store: &dyn LotteryStore) -> AppResult<SeedReport> {
    let existing = store.count_events().await?;
    if existing > 0 {
        info!("{} events already present, skipping demo seed", existing);
        return Ok(SeedReport {
            events: 0,
            applications: 0,
        });
    }

    let mut first_event = None;
    for (title, artist, venue, capacity) in DEMO_EVENTS {
        let event = store
            .insert_event(&NewEvent {
                title: title.to_string(),
                artist: artist.to_string(),
                venue: venue.to_string(),
                capacity,
            })
            .await?;
        first_event.get_or_insert(event.id);
    }
    info!("Seeded {} demo events", DEMO_EVENTS.len());

    let mut applications = 0;
    if let Some(event_id) = first_event {
        let mut txn = store.begin().await?;
        for (name, email) in DEMO_APPLICANTS {
            txn.insert_application(event_id, name, email).await?;
            applications += 1;
        }
        txn.commit().await?;
        info!("Seeded {} demo applicants for event {}", applications, event_id);
    }

    Ok(SeedReport {
        events: DEMO_EVENTS.len(),
        applications,
    })
}
