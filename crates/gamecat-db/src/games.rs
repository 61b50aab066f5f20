//! Database operations for `games` and its four join tables.

use chrono::{DateTime, Utc};
use gamecat_core::{GameLinks, NewGame, ReferenceKind, StoredGame};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `games` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// `NUMERIC(12,2)`; `NULL` when the catalog carried no parseable price.
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub rating: Option<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Returns the identity of the game named `name`, if stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_game_by_name(pool: &PgPool, name: &str) -> Result<Option<StoredGame>, DbError> {
    let row = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, slug FROM games WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, slug)| StoredGame { id, name, slug }))
}

/// Fetches the full row of the game named `name`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no such game exists, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn get_game_by_name(pool: &PgPool, name: &str) -> Result<GameRow, DbError> {
    let row = sqlx::query_as::<_, GameRow>(
        "SELECT id, name, slug, price, currency, release_date, description, \
                short_description, rating, published_at, created_at \
         FROM games \
         WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Inserts a game and its reference links in one transaction.
///
/// Returns `None` without writing anything if a game with the same name
/// already exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction is
/// rolled back.
pub async fn create_game(
    pool: &PgPool,
    game: &NewGame,
    links: &GameLinks,
) -> Result<Option<StoredGame>, DbError> {
    let mut tx = pool.begin().await?;

    let details = game.details.as_ref();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO games \
             (name, slug, price, currency, release_date, description, \
              short_description, rating, published_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (name) DO NOTHING \
         RETURNING id",
    )
    .bind(&game.name)
    .bind(&game.slug)
    .bind(game.price)
    .bind(&game.currency)
    .bind(game.release_date)
    .bind(details.map(|d| d.description.as_str()))
    .bind(details.map(|d| d.short_description.as_str()))
    .bind(details.map(|d| d.rating.as_str()))
    .bind(game.published_at)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(id) = id else {
        tx.rollback().await?;
        return Ok(None);
    };

    for kind in ReferenceKind::ALL {
        let ids = links.ids(kind);
        if ids.is_empty() {
            continue;
        }
        let sql = format!(
            "INSERT INTO {} (game_id, {}_id) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT DO NOTHING",
            kind.link_table_name(),
            kind.as_str()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(ids)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Some(StoredGame {
        id,
        name: game.name.clone(),
        slug: game.slug.clone(),
    }))
}

/// Reads back the reference ids linked to game `game_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn list_game_links(pool: &PgPool, game_id: i64) -> Result<GameLinks, DbError> {
    let mut links = GameLinks::default();
    for kind in ReferenceKind::ALL {
        let sql = format!(
            "SELECT {}_id FROM {} WHERE game_id = $1 ORDER BY 1",
            kind.as_str(),
            kind.link_table_name()
        );
        let ids = sqlx::query_scalar::<_, i64>(&sql)
            .bind(game_id)
            .fetch_all(pool)
            .await?;
        for id in ids {
            links.push(kind, id);
        }
    }
    Ok(links)
}
