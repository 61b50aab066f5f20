//! Response types for the public GOG catalog endpoint (`/v1/catalog`).
//!
//! ## Observed shape
//!
//! - `releaseDate` is a dotted date string (`"2015.05.18"`); some entries use
//!   ISO dates or omit it entirely.
//! - `price` is absent for unreleased or delisted products. `finalMoney.amount`
//!   is a decimal string (`"9.99"`), never a JSON number.
//! - `genres` are objects with `name` and `slug`; `operatingSystems`,
//!   `developers`, and `publishers` are plain string arrays. Any of them may
//!   be missing, so every list defaults to empty.
//! - `screenshots` carry a `{formatter}` placeholder selecting the image size.

use serde::Deserialize;

/// Top-level response from `GET /v1/catalog`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub product_count: Option<u64>,
    pub products: Vec<CatalogProduct>,
}

/// A single product from the catalog listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub title: String,

    /// Catalog slug, e.g. `"the-witcher-3-wild-hunt"`.
    pub slug: String,

    #[serde(default)]
    pub price: Option<CatalogPrice>,

    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub genres: Vec<CatalogGenre>,

    #[serde(default)]
    pub operating_systems: Vec<String>,

    #[serde(default)]
    pub developers: Vec<String>,

    #[serde(default)]
    pub publishers: Vec<String>,

    #[serde(default)]
    pub cover_horizontal: Option<String>,

    #[serde(default)]
    pub screenshots: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPrice {
    #[serde(default)]
    pub final_money: Option<CatalogMoney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMoney {
    pub amount: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogGenre {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}
