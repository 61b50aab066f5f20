//! The populate pipeline: fetch → references → games.

use futures::stream::{self, StreamExt};
use gamecat_db::ContentStore;

use super::games::populate_game;
use super::references::{collect_reference_names, upsert_references};
use super::report::{PipelineError, PopulateReport};
use super::PopulateClients;

/// Runs one populate pass against `store`.
///
/// `params` are forwarded verbatim to the catalog endpoint. References and
/// games are each processed at most `max_concurrency` at a time.
///
/// # Errors
///
/// Returns [`PipelineError::Catalog`] if the catalog cannot be fetched. Every
/// later failure is recorded in the report instead.
pub(crate) async fn populate<S: ContentStore>(
    store: &S,
    clients: &PopulateClients,
    params: &[(String, String)],
    max_concurrency: usize,
) -> Result<PopulateReport, PipelineError> {
    let response = clients
        .catalog
        .fetch_products(params)
        .await
        .map_err(PipelineError::Catalog)?;
    let products = response.products;
    tracing::info!(products = products.len(), "fetched catalog page");

    let names = collect_reference_names(&products);
    let (references, mut failures) = upsert_references(store, &names, max_concurrency).await;
    tracing::info!(
        distinct = names.len(),
        created = references.created,
        existing = references.existing,
        failed = references.failed,
        "reference data upserted"
    );

    let results: Vec<_> = stream::iter(&products)
        .map(|product| populate_game(store, clients, product))
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await;

    let mut games = Vec::with_capacity(results.len());
    for (outcome, game_failures) in results {
        games.push(outcome);
        failures.extend(game_failures);
    }

    let report = PopulateReport {
        products_fetched: products.len(),
        references,
        games,
        failures,
    };
    tracing::info!(
        created = report.games_created(),
        skipped = report.games_skipped(),
        failed = report.games_failed(),
        uploads_attempted = report.uploads_attempted(),
        uploads_failed = report.uploads_failed(),
        "populate finished"
    );
    Ok(report)
}
