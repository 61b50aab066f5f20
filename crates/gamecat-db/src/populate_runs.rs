//! Database operations for `populate_runs`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `populate_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PopulateRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub trigger_source: String,
    /// Catalog query parameters as a JSON array of `[key, value]` pairs.
    pub query_params: serde_json::Value,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// The schema defines this as `INTEGER NOT NULL DEFAULT 0`.
    pub games_created: i32,
    pub error_message: Option<String>,
    /// Serialized run report; set only on success.
    pub report: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

const RUN_COLUMNS: &str = "id, public_id, trigger_source, query_params, status, started_at, \
                           completed_at, games_created, error_message, report, created_at";

/// Creates a new populate run in `queued` status.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_populate_run(
    pool: &PgPool,
    trigger_source: &str,
    query_params: &[(String, String)],
) -> Result<PopulateRunRow, DbError> {
    let public_id = Uuid::new_v4();
    let params = serde_json::Value::Array(
        query_params
            .iter()
            .map(|(k, v)| serde_json::json!([k, v]))
            .collect(),
    );

    let sql = format!(
        "INSERT INTO populate_runs (public_id, trigger_source, query_params, status) \
         VALUES ($1, $2, $3, 'queued') \
         RETURNING {RUN_COLUMNS}"
    );
    let row = sqlx::query_as::<_, PopulateRunRow>(&sql)
        .bind(public_id)
        .bind(trigger_source)
        .bind(params)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Marks a run as `running` and sets `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::InvalidPopulateRunTransition`] if the run is not
/// `queued`, or [`DbError::Sqlx`] if the update fails.
pub async fn start_populate_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE populate_runs \
         SET status = 'running', started_at = NOW() \
         WHERE id = $1 AND status = 'queued'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidPopulateRunTransition {
            id,
            expected_status: "queued",
        });
    }

    Ok(())
}

/// Marks a run as `succeeded` and stores its counters and report.
///
/// # Errors
///
/// Returns [`DbError::InvalidPopulateRunTransition`] if the run is not
/// `running`, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_populate_run(
    pool: &PgPool,
    id: i64,
    games_created: i32,
    report: &serde_json::Value,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE populate_runs \
         SET status = 'succeeded', completed_at = NOW(), games_created = $1, report = $2 \
         WHERE id = $3 AND status = 'running'",
    )
    .bind(games_created)
    .bind(report)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidPopulateRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed`, sets `completed_at = NOW()` and `error_message`.
///
/// # Errors
///
/// Returns [`DbError::InvalidPopulateRunTransition`] if the run is not
/// `running`, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_populate_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE populate_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidPopulateRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by its internal `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_populate_run(pool: &PgPool, id: i64) -> Result<PopulateRunRow, DbError> {
    let sql = format!("SELECT {RUN_COLUMNS} FROM populate_runs WHERE id = $1");
    let row = sqlx::query_as::<_, PopulateRunRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` runs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_populate_runs(pool: &PgPool, limit: i64) -> Result<Vec<PopulateRunRow>, DbError> {
    let sql = format!(
        "SELECT {RUN_COLUMNS} FROM populate_runs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1"
    );
    let rows = sqlx::query_as::<_, PopulateRunRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
