//! The content store seam used by the populate pipeline.

use futures::future::BoxFuture;
use gamecat_core::{GameLinks, NewGame, ReferenceKind, StoredGame};
use sqlx::PgPool;

use crate::references::ReferenceUpsert;
use crate::DbError;

/// Find and create operations the populate pipeline needs from the content
/// backend. Implementations must make [`ContentStore::upsert_reference`] and
/// [`ContentStore::create_game`] atomic with respect to the entity's name.
pub trait ContentStore: Send + Sync {
    fn find_reference(
        &self,
        kind: ReferenceKind,
        name: String,
    ) -> BoxFuture<'static, Result<Option<i64>, DbError>>;

    fn upsert_reference(
        &self,
        kind: ReferenceKind,
        name: String,
        slug: String,
    ) -> BoxFuture<'static, Result<ReferenceUpsert, DbError>>;

    fn find_game_by_name(&self, name: String)
        -> BoxFuture<'static, Result<Option<StoredGame>, DbError>>;

    /// Returns `None` if a game with the same name already exists.
    fn create_game(
        &self,
        game: NewGame,
        links: GameLinks,
    ) -> BoxFuture<'static, Result<Option<StoredGame>, DbError>>;
}

/// [`ContentStore`] backed by the Postgres schema under `migrations/`.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ContentStore for PgContentStore {
    fn find_reference(
        &self,
        kind: ReferenceKind,
        name: String,
    ) -> BoxFuture<'static, Result<Option<i64>, DbError>> {
        let pool = self.pool.clone();
        Box::pin(async move { crate::references::find_reference(&pool, kind, &name).await })
    }

    fn upsert_reference(
        &self,
        kind: ReferenceKind,
        name: String,
        slug: String,
    ) -> BoxFuture<'static, Result<ReferenceUpsert, DbError>> {
        let pool = self.pool.clone();
        Box::pin(
            async move { crate::references::upsert_reference(&pool, kind, &name, &slug).await },
        )
    }

    fn find_game_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, Result<Option<StoredGame>, DbError>> {
        let pool = self.pool.clone();
        Box::pin(async move { crate::games::find_game_by_name(&pool, &name).await })
    }

    fn create_game(
        &self,
        game: NewGame,
        links: GameLinks,
    ) -> BoxFuture<'static, Result<Option<StoredGame>, DbError>> {
        let pool = self.pool.clone();
        Box::pin(async move { crate::games::create_game(&pool, &game, &links).await })
    }
}
