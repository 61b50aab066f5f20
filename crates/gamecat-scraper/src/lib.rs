pub mod client;
pub mod detail;
pub mod error;
mod html;
pub mod media;
pub mod normalize;
mod rate_limit;
pub mod types;

pub use client::CatalogClient;
pub use detail::{extract_game_details, StorefrontClient, SHORT_DESCRIPTION_MAX_CHARS};
pub use error::ScraperError;
pub use media::{MediaClient, MediaField};
pub use normalize::{
    check_product_identity, gallery_image_urls, normalize_game, parse_release_date,
    MAX_GALLERY_IMAGES,
};
pub use types::{CatalogProduct, CatalogResponse};
