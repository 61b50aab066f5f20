//! Typed per-stage results of a populate run.
//!
//! Every recoverable failure becomes a [`StageFailure`] entry and, for games,
//! a [`GameOutcome`]; only a catalog fetch failure aborts the run
//! ([`PipelineError`]).

use serde::Serialize;
use thiserror::Error;

/// The step of the pipeline a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Stage {
    Normalize,
    ReferenceUpsert,
    ReferenceLookup,
    GameLookup,
    Scrape,
    CreateGame,
    CoverUpload,
    GalleryUpload,
}

impl Stage {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::ReferenceUpsert => "reference_upsert",
            Stage::ReferenceLookup => "reference_lookup",
            Stage::GameLookup => "game_lookup",
            Stage::Scrape => "scrape",
            Stage::CreateGame => "create_game",
            Stage::CoverUpload => "cover_upload",
            Stage::GalleryUpload => "gallery_upload",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable failure: which stage, on what subject (a reference name, a
/// game title, an image URL), and the error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StageFailure {
    pub stage: Stage,
    pub subject: String,
    pub error: String,
}

impl StageFailure {
    pub(crate) fn new(stage: Stage, subject: impl Into<String>, error: impl ToString) -> Self {
        let failure = Self {
            stage,
            subject: subject.into(),
            error: error.to_string(),
        };
        tracing::warn!(
            stage = %failure.stage,
            subject = %failure.subject,
            error = %failure.error,
            "populate stage failed"
        );
        failure
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct ReferenceTotals {
    pub created: usize,
    pub existing: usize,
    pub failed: usize,
}

/// What happened to one catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub(crate) enum GameOutcome {
    Created {
        id: i64,
        name: String,
        /// `false` when the storefront scrape failed and the game was stored
        /// without description and rating.
        details_scraped: bool,
        cover_uploaded: bool,
        cover_failed: bool,
        gallery_uploaded: usize,
        gallery_failed: usize,
        /// Reference names that had no stored entity and were left unlinked.
        missing_references: usize,
    },
    /// Already stored, either before the run or by a concurrent writer.
    Skipped { name: String },
    Failed {
        name: String,
        stage: Stage,
        error: String,
    },
}

/// Aggregated result of one populate run; serialized into `populate_runs.report`.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct PopulateReport {
    pub products_fetched: usize,
    pub references: ReferenceTotals,
    pub games: Vec<GameOutcome>,
    pub failures: Vec<StageFailure>,
}

impl PopulateReport {
    pub(crate) fn games_created(&self) -> usize {
        self.games
            .iter()
            .filter(|g| matches!(g, GameOutcome::Created { .. }))
            .count()
    }

    pub(crate) fn games_skipped(&self) -> usize {
        self.games
            .iter()
            .filter(|g| matches!(g, GameOutcome::Skipped { .. }))
            .count()
    }

    pub(crate) fn games_failed(&self) -> usize {
        self.games
            .iter()
            .filter(|g| matches!(g, GameOutcome::Failed { .. }))
            .count()
    }

    pub(crate) fn uploads_attempted(&self) -> usize {
        self.games
            .iter()
            .map(|g| match g {
                GameOutcome::Created {
                    cover_uploaded,
                    cover_failed,
                    gallery_uploaded,
                    gallery_failed,
                    ..
                } => usize::from(*cover_uploaded || *cover_failed) + gallery_uploaded + gallery_failed,
                _ => 0,
            })
            .sum()
    }

    pub(crate) fn uploads_failed(&self) -> usize {
        self.games
            .iter()
            .map(|g| match g {
                GameOutcome::Created {
                    cover_failed,
                    gallery_failed,
                    ..
                } => usize::from(*cover_failed) + gallery_failed,
                _ => 0,
            })
            .sum()
    }
}

/// A failure that aborts the whole run.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("catalog fetch failed: {0}")]
    Catalog(#[source] gamecat_scraper::ScraperError),
}
