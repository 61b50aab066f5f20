//! Storefront page scraping for descriptive game fields.
//!
//! The catalog listing carries no description or age rating, so both are
//! read from the product's storefront page: the `.description` block and the
//! `<use>` reference inside `.age-restrictions__icon`.

use std::sync::LazyLock;
use std::time::Duration;

use gamecat_core::{storefront_slug, GameDetails, DEFAULT_RATING};
use reqwest::Client;
use scraper::node::Element;
use scraper::{Html, Selector};

use crate::error::ScraperError;
use crate::html::clean_description;

/// Maximum length of `short_description`, in characters.
pub const SHORT_DESCRIPTION_MAX_CHARS: usize = 160;

static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".description").expect("valid description selector"));
static AGE_ICON_USE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".age-restrictions__icon use").expect("valid age icon selector")
});

/// Fetches storefront pages and extracts [`GameDetails`] from them.
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    /// Creates a client for storefront pages under `base_url`
    /// (e.g. `https://www.gog.com/game`).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// URL of the storefront page for a catalog slug.
    #[must_use]
    pub fn page_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url, storefront_slug(slug))
    }

    /// Fetches the storefront page for `slug` and extracts its details.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`]: network failure.
    /// - [`ScraperError::NotFound`] / [`ScraperError::UnexpectedStatus`]: non-2xx.
    /// - [`ScraperError::MissingElement`]: the page has no description block.
    pub async fn fetch_game_details(&self, slug: &str) -> Result<GameDetails, ScraperError> {
        let url = self.page_url(slug);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound { url });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        extract_game_details(&body).map_err(|e| match e {
            ScraperError::MissingElement { selector, .. } => ScraperError::MissingElement {
                selector,
                context: url,
            },
            other => other,
        })
    }
}

/// Extracts description, short description, and rating from a storefront page.
///
/// # Errors
///
/// Returns [`ScraperError::MissingElement`] if no `.description` element exists.
pub fn extract_game_details(html: &str) -> Result<GameDetails, ScraperError> {
    let document = Html::parse_document(html);
    let block = document
        .select(&DESCRIPTION)
        .next()
        .ok_or_else(|| ScraperError::MissingElement {
            selector: ".description",
            context: "storefront page".to_owned(),
        })?;

    let cleaned = clean_description(block);
    let short_description = cleaned
        .text
        .chars()
        .take(SHORT_DESCRIPTION_MAX_CHARS)
        .collect();

    Ok(GameDetails {
        description: cleaned.html,
        short_description,
        rating: extract_rating(&document).unwrap_or_else(|| DEFAULT_RATING.to_owned()),
    })
}

/// Reads the rating code from the first `<use>` nested in an age-restriction
/// icon that carries a reference, dropping `#` and `_` (`"#PEGI_16"` becomes
/// `"PEGI16"`).
fn extract_rating(document: &Html) -> Option<String> {
    document.select(&AGE_ICON_USE).find_map(|el| {
        let code: String = use_reference(el.value())?
            .chars()
            .filter(|c| !matches!(c, '#' | '_'))
            .collect();
        (!code.is_empty()).then_some(code)
    })
}

/// `xlink:href`, falling back to `href`. Inside `<svg>` the parser files
/// `xlink:href` under the xlink namespace with the local name `href`.
fn use_reference(element: &Element) -> Option<&str> {
    let mut plain = None;
    for (name, value) in element.attrs() {
        match name {
            "xlink:href" => return Some(value),
            "href" => plain = plain.or(Some(value)),
            _ => {}
        }
    }
    plain
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
