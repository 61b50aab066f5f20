//! Conversion from raw catalog products to [`gamecat_core::NewGame`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use gamecat_core::{GameDetails, NewGame};
use rust_decimal::Decimal;

use crate::error::ScraperError;
use crate::types::CatalogProduct;

/// Maximum number of screenshots uploaded to a game's gallery.
pub const MAX_GALLERY_IMAGES: usize = 5;

/// Placeholder token embedded in catalog screenshot URLs.
pub const SCREENSHOT_FORMATTER_TOKEN: &str = "{formatter}";

/// Size variant substituted for [`SCREENSHOT_FORMATTER_TOKEN`].
pub const GALLERY_IMAGE_FORMAT: &str = "product_card_v2_mobile_slider_639";

/// Rejects products that cannot be keyed in the content store: games are
/// identified by title and their storefront page and files by slug.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if the title or slug is blank.
pub fn check_product_identity(product: &CatalogProduct) -> Result<(), ScraperError> {
    let reason = if product.title.trim().is_empty() {
        "title is empty"
    } else if product.slug.trim().is_empty() {
        "slug is empty"
    } else {
        return Ok(());
    };
    Err(ScraperError::Normalization {
        slug: product.slug.clone(),
        reason: reason.to_owned(),
    })
}

/// Builds the game record for `product`.
///
/// Price and release date are parsed leniently: values that do not parse are
/// dropped with a warning rather than failing the product.
#[must_use]
pub fn normalize_game(
    product: &CatalogProduct,
    details: Option<GameDetails>,
    published_at: DateTime<Utc>,
) -> NewGame {
    let (price, currency) = match product.price.as_ref().and_then(|p| p.final_money.as_ref()) {
        Some(money) => match Decimal::from_str(money.amount.trim()) {
            Ok(amount) => (Some(amount), money.currency.clone()),
            Err(e) => {
                tracing::warn!(
                    slug = %product.slug,
                    amount = %money.amount,
                    error = %e,
                    "unparseable catalog price; storing game without price"
                );
                (None, None)
            }
        },
        None => (None, None),
    };

    let release_date = product.release_date.as_deref().and_then(|raw| {
        let parsed = parse_release_date(raw);
        if parsed.is_none() {
            tracing::warn!(slug = %product.slug, release_date = %raw, "unparseable release date");
        }
        parsed
    });

    NewGame {
        name: product.title.clone(),
        slug: product.slug.clone(),
        price,
        currency,
        release_date,
        details,
        published_at,
    }
}

/// Parses the catalog's release date formats: `YYYY.MM.DD`, `YYYY-MM-DD`, and
/// RFC 3339 timestamps. Dates without a time resolve to midnight UTC.
#[must_use]
pub fn parse_release_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y.%m.%d", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Returns the first [`MAX_GALLERY_IMAGES`] screenshot URLs with the size
/// placeholder substituted.
#[must_use]
pub fn gallery_image_urls(product: &CatalogProduct) -> Vec<String> {
    product
        .screenshots
        .iter()
        .take(MAX_GALLERY_IMAGES)
        .map(|url| url.replace(SCREENSHOT_FORMATTER_TOKEN, GALLERY_IMAGE_FORMAT))
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
