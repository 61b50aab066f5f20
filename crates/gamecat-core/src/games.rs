//! Domain types shared by the scraper, the content store, and the populate
//! pipeline.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rating code stored when the storefront page carries no age-restriction icon.
pub const DEFAULT_RATING: &str = "BR0";

/// The four reference collections a game links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Developer,
    Publisher,
    /// Sourced from the catalog's `genres`.
    Category,
    /// Sourced from the catalog's `operatingSystems`.
    Platform,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [
        ReferenceKind::Developer,
        ReferenceKind::Publisher,
        ReferenceKind::Category,
        ReferenceKind::Platform,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Developer => "developer",
            ReferenceKind::Publisher => "publisher",
            ReferenceKind::Category => "category",
            ReferenceKind::Platform => "platform",
        }
    }

    /// Name of the table holding entities of this kind.
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            ReferenceKind::Developer => "developers",
            ReferenceKind::Publisher => "publishers",
            ReferenceKind::Category => "categories",
            ReferenceKind::Platform => "platforms",
        }
    }

    /// Name of the join table linking games to entities of this kind.
    #[must_use]
    pub fn link_table_name(self) -> &'static str {
        match self {
            ReferenceKind::Developer => "game_developers",
            ReferenceKind::Publisher => "game_publishers",
            ReferenceKind::Category => "game_categories",
            ReferenceKind::Platform => "game_platforms",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive fields scraped from a storefront page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    /// Cleaned inner HTML of the description block.
    pub description: String,
    /// Plain text, at most 160 characters.
    pub short_description: String,
    /// Age rating code such as `"PEGI16"`, or [`DEFAULT_RATING`].
    pub rating: String,
}

/// A game ready to be inserted into the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGame {
    pub name: String,
    pub slug: String,
    pub price: Option<Decimal>,
    /// ISO 4217 code reported alongside the price, e.g. `"USD"`.
    pub currency: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    /// `None` when the storefront scrape failed; the game is stored without them.
    pub details: Option<GameDetails>,
    pub published_at: DateTime<Utc>,
}

/// Reference entity ids a new game links to, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameLinks {
    pub developers: Vec<i64>,
    pub publishers: Vec<i64>,
    pub categories: Vec<i64>,
    pub platforms: Vec<i64>,
}

impl GameLinks {
    #[must_use]
    pub fn ids(&self, kind: ReferenceKind) -> &[i64] {
        match kind {
            ReferenceKind::Developer => &self.developers,
            ReferenceKind::Publisher => &self.publishers,
            ReferenceKind::Category => &self.categories,
            ReferenceKind::Platform => &self.platforms,
        }
    }

    /// Adds `id` under `kind`, ignoring repeats.
    pub fn push(&mut self, kind: ReferenceKind, id: i64) {
        let ids = match kind {
            ReferenceKind::Developer => &mut self.developers,
            ReferenceKind::Publisher => &mut self.publishers,
            ReferenceKind::Category => &mut self.categories,
            ReferenceKind::Platform => &mut self.platforms,
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        ReferenceKind::ALL.iter().map(|k| self.ids(*k).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identity of a game that exists in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: i64,
    pub name: String,
    pub slug: String,
}
