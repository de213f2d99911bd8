use crate::error::RepositoryError;
use crate::models::{Event, EventSummary, NewEvent};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Repository for event data access
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new EventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event
    pub async fn create(&self, new_event: &NewEvent) -> Result<Event, RepositoryError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, artist, venue, capacity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, artist, venue, capacity, lottery_executed, created_at
            "#,
        )
        .bind(&new_event.title)
        .bind(&new_event.artist)
        .bind(&new_event.venue)
        .bind(new_event.capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find an event with its application count
    pub async fn find_summary(&self, id: Uuid) -> Result<Option<EventSummary>, RepositoryError> {
        let summary = sqlx::query_as::<_, EventSummary>(
            r#"
            SELECT
                e.id,
                e.title,
                e.artist,
                e.venue,
                e.capacity,
                e.lottery_executed,
                e.created_at,
                (SELECT COUNT(*) FROM applications a WHERE a.event_id = e.id) AS application_count
            FROM events e
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    /// List all events with their application counts, oldest first
    pub async fn list_summaries(&self) -> Result<Vec<EventSummary>, RepositoryError> {
        let summaries = sqlx::query_as::<_, EventSummary>(
            r#"
            SELECT
                e.id,
                e.title,
                e.artist,
                e.venue,
                e.capacity,
                e.lottery_executed,
                e.created_at,
                (SELECT COUNT(*) FROM applications a WHERE a.event_id = e.id) AS application_count
            FROM events e
            ORDER BY e.created_at ASC, e.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Count all events
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Read an event and lock its row for the rest of the transaction
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Event>, RepositoryError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, artist, venue, capacity, lottery_executed, created_at
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(event)
    }

    /// Compare-and-set the executed flag; false when another writer got there first
    pub async fn mark_executed(conn: &mut PgConnection, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET lottery_executed = TRUE
            WHERE id = $1 AND lottery_executed = FALSE
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
