use crate::error::RepositoryError;
use crate::models::{Application, ApplicationStatus};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Repository for application data access
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Create a new ApplicationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find all applications for an event in submission order
    pub async fn find_by_event(
        &self,
        event_id: Uuid,
        name_filter: Option<&str>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, event_id, name, email, status, applied_at
            FROM applications
            WHERE event_id = $1
                AND ($2::TEXT IS NULL OR strpos(name, $2) > 0)
            ORDER BY applied_at ASC
            "#,
        )
        .bind(event_id)
        .bind(name_filter)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    /// Find applications for an event in one status, ordered by name bytes
    pub async fn find_by_status(
        &self,
        event_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>, RepositoryError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, event_id, name, email, status, applied_at
            FROM applications
            WHERE event_id = $1 AND status = $2
            ORDER BY name COLLATE "C" ASC, applied_at ASC
            "#,
        )
        .bind(event_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Insert a new pending application
    pub async fn create(
        conn: &mut PgConnection,
        event_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<Application, RepositoryError> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (event_id, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, name, email, status, applied_at
            "#,
        )
        .bind(event_id)
        .bind(name)
        .bind(email)
        .fetch_one(conn)
        .await?;

        Ok(application)
    }

    /// Snapshot of the pending pool for an event
    pub async fn find_pending(
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<Vec<Application>, RepositoryError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, event_id, name, email, status, applied_at
            FROM applications
            WHERE event_id = $1 AND status = 'pending'
            ORDER BY applied_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        Ok(applications)
    }

    /// Move pending applications to a final status
    pub async fn update_status(
        conn: &mut PgConnection,
        ids: &[Uuid],
        status: ApplicationStatus,
    ) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE applications
            SET status = $1
            WHERE id = ANY($2) AND status = 'pending'
            "#,
        )
        .bind(status.as_str())
        .bind(ids)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
