mod common;

use pagila_reports::{ReportExecutor, ReportKind, StoreError, db};

async fn unmigrated() -> ReportExecutor {
    let db = db::connect("sqlite::memory:", 1).await.expect("in-memory store opens");
    ReportExecutor::new(db)
}

#[tokio::test]
async fn unreachable_store_is_unavailable() {
    let err = db::connect("sqlite:///definitely/missing/dir/pagila.db?mode=ro", 1)
        .await
        .expect_err("missing database file cannot be opened");

    assert!(matches!(err, StoreError::StoreUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_tables_are_schema_mismatches() {
    let reports = unmigrated().await;

    let err = reports.films_per_category().await.expect_err("no category table");
    assert!(matches!(err, StoreError::SchemaMismatch(_)), "got {err:?}");

    let err = reports.verify_schema().await.expect_err("no tables at all");
    assert!(matches!(err, StoreError::SchemaMismatch(_)), "got {err:?}");
}

#[tokio::test]
async fn batch_fails_without_partial_output() {
    let reports = unmigrated().await;

    let result = reports.run_all(&ReportKind::ALL, 2).await;

    assert!(matches!(result, Err(StoreError::SchemaMismatch(_))));
}

#[tokio::test]
async fn migrated_store_passes_schema_check() {
    let db = common::setup().await;

    ReportExecutor::new(db).verify_schema().await.expect("schema matches");
}
