//! Game stage: for each catalog product not yet stored, link references,
//! scrape storefront details, create the game, and attach its images.

use chrono::Utc;
use gamecat_core::{GameLinks, ReferenceKind, StoredGame};
use gamecat_db::ContentStore;
use gamecat_scraper::{
    check_product_identity, gallery_image_urls, normalize_game, CatalogProduct, MediaField,
};

use super::references::product_reference_names;
use super::report::{GameOutcome, Stage, StageFailure};
use super::PopulateClients;

/// Result of uploading the images of one newly created game.
#[derive(Debug, Default)]
struct MediaTotals {
    cover_uploaded: bool,
    cover_failed: bool,
    gallery_uploaded: usize,
    gallery_failed: usize,
}

/// Runs the game stage for one product. Never fails as a whole: every error
/// ends up in the returned outcome and failure list.
pub(crate) async fn populate_game<S: ContentStore>(
    store: &S,
    clients: &PopulateClients,
    product: &CatalogProduct,
) -> (GameOutcome, Vec<StageFailure>) {
    let name = product.title.clone();
    let mut failures = Vec::new();

    if let Err(e) = check_product_identity(product) {
        let failure = StageFailure::new(Stage::Normalize, name.clone(), &e);
        let outcome = GameOutcome::Failed {
            name,
            stage: Stage::Normalize,
            error: failure.error.clone(),
        };
        failures.push(failure);
        return (outcome, failures);
    }

    match store.find_game_by_name(name.clone()).await {
        Ok(Some(existing)) => {
            tracing::debug!(game = %name, id = existing.id, "game already stored; skipping");
            return (GameOutcome::Skipped { name }, failures);
        }
        Ok(None) => {}
        Err(e) => {
            let failure = StageFailure::new(Stage::GameLookup, name.clone(), &e);
            let outcome = GameOutcome::Failed {
                name,
                stage: Stage::GameLookup,
                error: failure.error.clone(),
            };
            failures.push(failure);
            return (outcome, failures);
        }
    }

    let (links, missing_references) = resolve_links(store, product, &mut failures).await;

    let details = match clients.storefront.fetch_game_details(&product.slug).await {
        Ok(details) => Some(details),
        Err(e) => {
            failures.push(StageFailure::new(Stage::Scrape, name.clone(), e));
            None
        }
    };
    let details_scraped = details.is_some();

    let game = normalize_game(product, details, Utc::now());
    let stored = match store.create_game(game, links).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            tracing::info!(game = %name, "game was created concurrently; skipping");
            return (GameOutcome::Skipped { name }, failures);
        }
        Err(e) => {
            let failure = StageFailure::new(Stage::CreateGame, name.clone(), &e);
            let outcome = GameOutcome::Failed {
                name,
                stage: Stage::CreateGame,
                error: failure.error.clone(),
            };
            failures.push(failure);
            return (outcome, failures);
        }
    };
    tracing::info!(game = %stored.name, id = stored.id, details_scraped, "created game");

    let media = upload_media(clients, product, &stored, &mut failures).await;

    let outcome = GameOutcome::Created {
        id: stored.id,
        name: stored.name,
        details_scraped,
        cover_uploaded: media.cover_uploaded,
        cover_failed: media.cover_failed,
        gallery_uploaded: media.gallery_uploaded,
        gallery_failed: media.gallery_failed,
        missing_references,
    };
    (outcome, failures)
}

/// Looks up the stored id of every reference the product names. Names with
/// no stored entity are left unlinked and counted.
async fn resolve_links<S: ContentStore>(
    store: &S,
    product: &CatalogProduct,
    failures: &mut Vec<StageFailure>,
) -> (GameLinks, usize) {
    let mut links = GameLinks::default();
    let mut missing = 0usize;

    for kind in ReferenceKind::ALL {
        for name in product_reference_names(product, kind) {
            match store.find_reference(kind, name.to_owned()).await {
                Ok(Some(id)) => links.push(kind, id),
                Ok(None) => {
                    tracing::warn!(
                        game = %product.title,
                        kind = %kind,
                        name,
                        "reference not found; leaving unlinked"
                    );
                    missing += 1;
                }
                Err(e) => {
                    failures.push(StageFailure::new(
                        Stage::ReferenceLookup,
                        format!("{kind} '{name}'"),
                        e,
                    ));
                    missing += 1;
                }
            }
        }
    }

    (links, missing)
}

/// Uploads the cover, then up to five gallery images in parallel. Failures
/// are recorded per image; the game itself is kept regardless.
async fn upload_media(
    clients: &PopulateClients,
    product: &CatalogProduct,
    game: &StoredGame,
    failures: &mut Vec<StageFailure>,
) -> MediaTotals {
    let mut totals = MediaTotals::default();

    if let Some(cover_url) = product.cover_horizontal.as_deref() {
        match clients
            .media
            .transfer_image(cover_url, game.id, MediaField::Cover, &game.slug)
            .await
        {
            Ok(()) => totals.cover_uploaded = true,
            Err(e) => {
                totals.cover_failed = true;
                failures.push(StageFailure::new(Stage::CoverUpload, cover_url, e));
            }
        }
    }

    let gallery = gallery_image_urls(product);
    let uploads = gallery.iter().map(|url| {
        clients
            .media
            .transfer_image(url, game.id, MediaField::Gallery, &game.slug)
    });
    let results = futures::future::join_all(uploads).await;

    for (url, result) in gallery.iter().zip(results) {
        match result {
            Ok(()) => totals.gallery_uploaded += 1,
            Err(e) => {
                totals.gallery_failed += 1;
                failures.push(StageFailure::new(Stage::GalleryUpload, url.as_str(), e));
            }
        }
    }

    totals
}
