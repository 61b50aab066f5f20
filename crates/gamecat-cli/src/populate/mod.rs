//! `populate` command: pull a catalog page into the content store.
//!
//! Called from `main` after config is loaded. The pipeline itself is generic
//! over [`ContentStore`]; this module wires it to Postgres and records each
//! invocation as a `populate_runs` row.

mod games;
mod pipeline;
mod references;
mod report;

use clap::Args;
use gamecat_core::{AppConfig, ReferenceKind};
use gamecat_db::PgContentStore;
use gamecat_scraper::{CatalogClient, MediaClient, ScraperError, StorefrontClient};

use pipeline::populate;
use report::PopulateReport;

/// Arguments of `gamecat-cli populate`.
#[derive(Debug, Args)]
pub struct PopulateArgs {
    /// Catalog query parameter forwarded verbatim (repeatable), e.g. `--param order=desc:trending`
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Shorthand for `--param limit=N`
    #[arg(long)]
    pub limit: Option<u32>,

    /// Shorthand for `--param page=N`
    #[arg(long)]
    pub page: Option<u32>,

    /// Fetch and print the catalog page without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl PopulateArgs {
    /// Query parameters in command-line order. `--limit` and `--page` replace
    /// a `--param` with the same key.
    pub(crate) fn catalog_params(&self) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        for (key, value) in [("limit", self.limit), ("page", self.page)] {
            let Some(value) = value else { continue };
            let value = value.to_string();
            match params.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value,
                None => params.push((key.to_owned(), value)),
            }
        }
        params
    }
}

/// Parses `KEY=VALUE`; the value may itself contain `=`.
pub(crate) fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// The three outbound HTTP clients the pipeline uses.
pub(crate) struct PopulateClients {
    pub catalog: CatalogClient,
    pub storefront: StorefrontClient,
    pub media: MediaClient,
}

impl PopulateClients {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            catalog: CatalogClient::new(
                &config.catalog_url,
                config.request_timeout_secs,
                &config.user_agent,
                config.max_retries,
                config.retry_backoff_base_secs,
            )?,
            storefront: StorefrontClient::new(
                &config.storefront_url,
                config.request_timeout_secs,
                &config.user_agent,
            )?,
            media: MediaClient::new(
                &config.upload_url,
                &config.upload_ref,
                config.upload_token.as_deref(),
                config.request_timeout_secs,
                &config.user_agent,
            )?,
        })
    }
}

/// Runs the pipeline against Postgres, bracketed by `populate_runs`
/// bookkeeping (`queued → running → succeeded | failed`).
///
/// # Errors
///
/// Returns an error if the clients cannot be built, the run row cannot be
/// written, or the catalog fetch fails. Per-game failures are reported in the
/// summary, not propagated.
pub(crate) async fn run_populate(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    args: &PopulateArgs,
) -> anyhow::Result<()> {
    let params = args.catalog_params();
    let clients = PopulateClients::from_config(config)?;
    let store = PgContentStore::new(pool.clone());

    let run = gamecat_db::create_populate_run(pool, "cli", &params).await?;
    if let Err(e) = gamecat_db::start_populate_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, format!("{e:#}")).await;
        return Err(e.into());
    }
    tracing::info!(run_id = run.id, public_id = %run.public_id, "populate run started");

    let report = match populate(&store, &clients, &params, config.max_concurrency).await {
        Ok(report) => report,
        Err(e) => {
            fail_run_best_effort(pool, run.id, format!("{e:#}")).await;
            return Err(e.into());
        }
    };

    let games_created = i32::try_from(report.games_created()).unwrap_or(i32::MAX);
    let report_json = serde_json::to_value(&report)?;
    if let Err(e) =
        gamecat_db::complete_populate_run(pool, run.id, games_created, &report_json).await
    {
        fail_run_best_effort(pool, run.id, format!("{e:#}")).await;
        return Err(e.into());
    }

    print_summary(&report);
    Ok(())
}

/// Fetches the catalog page and prints the products and distinct reference
/// names it would write. Touches neither the database nor the upload endpoint.
///
/// # Errors
///
/// Returns an error if the catalog client cannot be built or the fetch fails.
pub(crate) async fn run_populate_dry_run(
    config: &AppConfig,
    args: &PopulateArgs,
) -> anyhow::Result<()> {
    let params = args.catalog_params();
    let catalog = CatalogClient::new(
        &config.catalog_url,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let response = catalog.fetch_products(&params).await?;

    println!("dry-run: catalog returned {} products", response.products.len());
    for product in &response.products {
        println!("  {} ({})", product.title, product.slug);
    }

    let names = references::collect_reference_names(&response.products);
    for kind in ReferenceKind::ALL {
        let kind_names: Vec<&str> = names.get(kind).collect();
        println!("  {}: [{}]", kind.table_name(), kind_names.join(", "));
    }
    Ok(())
}

fn print_summary(report: &PopulateReport) {
    println!(
        "populated {} products: {} created, {} skipped, {} failed",
        report.products_fetched,
        report.games_created(),
        report.games_skipped(),
        report.games_failed()
    );
    println!(
        "references: {} created, {} existing, {} failed",
        report.references.created, report.references.existing, report.references.failed
    );
    println!(
        "uploads: {} attempted, {} failed",
        report.uploads_attempted(),
        report.uploads_failed()
    );
    for failure in &report.failures {
        println!("  [{}] {}: {}", failure.stage, failure.subject, failure.error);
    }
}

/// Attempt to mark a populate run as failed, logging any secondary error.
async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, message: String) {
    if let Err(mark_err) = gamecat_db::fail_populate_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark populate run as failed"
        );
    }
}

#[cfg(test)]
#[path = "populate_test.rs"]
mod tests;
