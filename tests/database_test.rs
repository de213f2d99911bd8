//! PostgreSQL-backed tests. Each `#[sqlx::test]` gets a fresh database with
//! migrations applied; run with `DATABASE_URL` set and `--ignored`.

mod helpers;

use helpers::*;
use lottery_backend::database::{run_migrations, Database};
use lottery_backend::error::{AppError, RepositoryError};
use lottery_backend::models::*;
use lottery_backend::repositories::*;
use rand::rngs::mock::StepRng;
use sqlx::{PgPool, Row};
use uuid::Uuid;

// ============================================================================
// Migration Tests
// ============================================================================

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_migrations_ran(pool: PgPool) {
    for table in ["events", "applications"] {
        let exists: bool = sqlx::query(
            "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap()
        .get(0);

        assert!(exists, "Table {} should exist", table);
    }
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_migrations_rerun_cleanly(pool: PgPool) {
    run_migrations(&pool, None).await.unwrap();

    let database = Database::new(pool);
    let repo = EventRepository::new(database.pool().clone());
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_capacity_check_constraint(pool: PgPool) {
    let repo = EventRepository::new(pool);
    let result = repo.create(&concert("Nobody", 0)).await;
    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
}

// ============================================================================
// Event Repository Tests
// ============================================================================

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_create_and_find_event(pool: PgPool) {
    let repo = EventRepository::new(pool);

    let event = repo.create(&concert("Arena Night", 3)).await.unwrap();
    assert_eq!(event.capacity, 3);
    assert!(!event.lottery_executed);
    assert!(event.is_open());

    let summary = repo.find_summary(event.id).await.unwrap().unwrap();
    assert_eq!(summary.event.id, event.id);
    assert_eq!(summary.application_count, 0);

    assert!(repo.find_summary(Uuid::new_v4()).await.unwrap().is_none());
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_mark_executed_is_compare_and_set(pool: PgPool) {
    let repo = EventRepository::new(pool.clone());
    let event = repo.create(&concert("Once", 1)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(EventRepository::mark_executed(&mut *tx, event.id).await.unwrap());
    assert!(!EventRepository::mark_executed(&mut *tx, event.id).await.unwrap());
    tx.commit().await.unwrap();

    let summary = repo.find_summary(event.id).await.unwrap().unwrap();
    assert!(summary.event.lottery_executed);
}

// ============================================================================
// Application Repository Tests
// ============================================================================

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_application_foreign_key(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let result =
        ApplicationRepository::create(&mut *conn, Uuid::new_v4(), "Ann", "ann@example.com").await;
    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_update_status_skips_settled_rows(pool: PgPool) {
    let events = EventRepository::new(pool.clone());
    let applications = ApplicationRepository::new(pool.clone());
    let event = events.create(&concert("Settled", 1)).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let ann = ApplicationRepository::create(&mut *conn, event.id, "Ann", "ann@example.com")
        .await
        .unwrap();
    assert_eq!(ann.status, "pending");

    let won = ApplicationRepository::update_status(&mut *conn, &[ann.id], ApplicationStatus::Won)
        .await
        .unwrap();
    assert_eq!(won, 1);
    let lost = ApplicationRepository::update_status(&mut *conn, &[ann.id], ApplicationStatus::Lost)
        .await
        .unwrap();
    assert_eq!(lost, 0);
    assert_eq!(
        ApplicationRepository::update_status(&mut *conn, &[], ApplicationStatus::Lost)
            .await
            .unwrap(),
        0
    );

    let winners = applications
        .find_by_status(event.id, ApplicationStatus::Won)
        .await
        .unwrap();
    assert_eq!(winners.len(), 1);
    assert!(ApplicationRepository::find_pending(&mut *conn, event.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_name_filter_is_case_sensitive_substring(pool: PgPool) {
    let events = EventRepository::new(pool.clone());
    let applications = ApplicationRepository::new(pool.clone());
    let event = events.create(&concert("Roster", 2)).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    for name in ["Anna", "Joanna", "Bob"] {
        ApplicationRepository::create(&mut *conn, event.id, name, "x@example.com")
            .await
            .unwrap();
    }

    let filtered = applications.find_by_event(event.id, Some("anna")).await.unwrap();
    let names: Vec<&str> = filtered.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Joanna"]);

    let everyone = applications.find_by_event(event.id, None).await.unwrap();
    assert_eq!(everyone.len(), 3);
}

// ============================================================================
// Service Tests against PostgreSQL
// ============================================================================

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_lottery_commits_partition(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let app = &db.app;

    let event = app.create_event("Arena Night", 2).await;
    app.apply_all(event.id, &["A", "B", "C"]).await;

    let mut rng = StepRng::new(0, 0);
    let outcome = app
        .state
        .lottery_service
        .execute_lottery_with(event.id, &mut rng)
        .await
        .unwrap();
    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.winners, 2);
    assert_eq!(outcome.losers, 1);

    let results = app.state.event_service.get_results(event.id).await.unwrap();
    assert_partition(&results, &["A", "B", "C"], 2);
    assert_sorted_by_name(&results.winners);
    assert!(app.is_executed(event.id).await);

    db.cleanup().await;
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_second_lottery_is_rejected(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let app = &db.app;

    let event = app.create_event("Twice", 1).await;
    app.apply_all(event.id, &["A", "B"]).await;

    app.state.lottery_service.execute_lottery(event.id).await.unwrap();
    let before = app.statuses(event.id).await;

    let second = app.state.lottery_service.execute_lottery(event.id).await;
    assert!(matches!(second, Err(AppError::AlreadyExecuted(_))));
    assert_eq!(app.statuses(event.id).await, before);

    let late = app
        .state
        .application_service
        .submit_application(event.id, "Z", "z@example.com")
        .await;
    assert!(matches!(late, Err(AppError::LotteryClosed(_))));
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_empty_pool_rolls_back(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let app = &db.app;

    let event = app.create_event("Empty", 2).await;
    let result = app.state.lottery_service.execute_lottery(event.id).await;
    assert!(matches!(result, Err(AppError::EmptyPool(_))));
    assert!(!app.is_executed(event.id).await);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_uncommitted_transaction_rolls_back(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let event = db.app.create_event("Rollback", 2).await;

    {
        let mut txn = db.app.store.begin().await.unwrap();
        txn.insert_application(event.id, "Ghost", "ghost@example.com")
            .await
            .unwrap();
        assert!(txn.mark_executed(event.id).await.unwrap());
    }

    let summary = db.app.state.event_service.get_event(event.id).await.unwrap();
    assert_eq!(summary.application_count, 0);
    assert!(!summary.event.lottery_executed);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_results_order_names_by_bytes(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let app = &db.app;

    let event = app.create_event("Mixed Case", 10).await;
    app.apply_all(event.id, &["bob", "Carol", "alice", "Dave"]).await;
    app.state.lottery_service.execute_lottery(event.id).await.unwrap();

    let results = app.state.event_service.get_results(event.id).await.unwrap();
    let winners: Vec<&str> = results.winners.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(winners, vec!["Carol", "Dave", "alice", "bob"]);
}

// ============================================================================
// Concurrency against PostgreSQL
// ============================================================================

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_concurrent_triggers_commit_once(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let event = db.app.create_event("Rush Hour", 2).await;
    db.app.apply_all(event.id, &["A", "B", "C", "D"]).await;
    let event_id = event.id;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = db.app.state.clone();
        handles.push(tokio::spawn(async move {
            state.lottery_service.execute_lottery(event_id).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(outcome) => {
                succeeded += 1;
                assert_eq!(outcome.total, 4);
                assert_eq!(outcome.winners, 2);
            }
            Err(AppError::AlreadyExecuted(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    assert_eq!(succeeded, 1);

    let statuses = db.app.statuses(event_id).await;
    let won = statuses
        .iter()
        .filter(|(_, status)| *status == ApplicationStatus::Won)
        .count();
    let lost = statuses
        .iter()
        .filter(|(_, status)| *status == ApplicationStatus::Lost)
        .count();
    assert_eq!((won, lost), (2, 2));
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_no_application_stays_pending_after_concurrent_draw(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let event = db.app.create_event("Race", 1).await;
    db.app.apply_all(event.id, &["Early"]).await;
    let event_id = event.id;

    let mut handles = Vec::new();
    for i in 0..6 {
        let state = db.app.state.clone();
        handles.push(tokio::spawn(async move {
            let name = format!("Late{}", i);
            match state
                .application_service
                .submit_application(event_id, &name, "late@example.com")
                .await
            {
                Ok(_) | Err(AppError::LotteryClosed(_)) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }));
    }
    let draw = {
        let state = db.app.state.clone();
        tokio::spawn(async move { state.lottery_service.execute_lottery(event_id).await })
    };

    for handle in handles {
        handle.await.unwrap();
    }
    draw.await.unwrap().expect("Lottery should succeed");

    let statuses = db.app.statuses(event_id).await;
    assert!(statuses
        .iter()
        .all(|(_, status)| *status != ApplicationStatus::Pending));
    let won = statuses
        .iter()
        .filter(|(_, status)| *status == ApplicationStatus::Won)
        .count();
    assert_eq!(won, 1);
}
