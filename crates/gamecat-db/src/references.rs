//! Database operations for the reference tables: `developers`, `publishers`,
//! `categories`, and `platforms`.
//!
//! The four tables share a shape (`id`, `name UNIQUE`, `slug`, `created_at`),
//! so every query is parameterized over [`ReferenceKind::table_name`].

use gamecat_core::ReferenceKind;
use sqlx::PgPool;

use crate::DbError;

/// Result of [`upsert_reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceUpsert {
    pub id: i64,
    /// `false` when a row with the same name already existed.
    pub created: bool,
}

/// Looks up a reference entity by exact name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_reference(
    pool: &PgPool,
    kind: ReferenceKind,
    name: &str,
) -> Result<Option<i64>, DbError> {
    let sql = format!("SELECT id FROM {} WHERE name = $1", kind.table_name());
    let id = sqlx::query_scalar::<_, i64>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Inserts a reference entity unless one with the same name exists.
///
/// Conflicts on `name` leave the existing row untouched; its id is then read
/// back with a second query.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails, or [`DbError::NotFound`]
/// if the conflicting row disappeared between the two statements.
pub async fn upsert_reference(
    pool: &PgPool,
    kind: ReferenceKind,
    name: &str,
    slug: &str,
) -> Result<ReferenceUpsert, DbError> {
    let sql = format!(
        "INSERT INTO {} (name, slug) VALUES ($1, $2) \
         ON CONFLICT (name) DO NOTHING \
         RETURNING id",
        kind.table_name()
    );
    let inserted = sqlx::query_scalar::<_, i64>(&sql)
        .bind(name)
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    if let Some(id) = inserted {
        return Ok(ReferenceUpsert { id, created: true });
    }

    let id = find_reference(pool, kind, name)
        .await?
        .ok_or(DbError::NotFound)?;
    Ok(ReferenceUpsert { id, created: false })
}
