//! Reference-data stage: distinct developer, publisher, category, and
//! platform names across the batch, created once each.

use std::collections::{BTreeMap, BTreeSet};

use futures::stream::{self, StreamExt};
use gamecat_core::{slugify, ReferenceKind};
use gamecat_db::ContentStore;
use gamecat_scraper::CatalogProduct;

use super::report::{ReferenceTotals, Stage, StageFailure};

/// Names a product references for `kind`, in catalog order. Categories come
/// from `genres[].name`, platforms from `operatingSystems`.
pub(crate) fn product_reference_names(product: &CatalogProduct, kind: ReferenceKind) -> Vec<&str> {
    match kind {
        ReferenceKind::Developer => product.developers.iter().map(String::as_str).collect(),
        ReferenceKind::Publisher => product.publishers.iter().map(String::as_str).collect(),
        ReferenceKind::Category => product.genres.iter().map(|g| g.name.as_str()).collect(),
        ReferenceKind::Platform => product
            .operating_systems
            .iter()
            .map(String::as_str)
            .collect(),
    }
}

/// Distinct reference names per kind. Names are compared verbatim: no case
/// folding and no trimming.
#[derive(Debug, Default)]
pub(crate) struct ReferenceNames(BTreeMap<ReferenceKind, BTreeSet<String>>);

impl ReferenceNames {
    pub(crate) fn get(&self, kind: ReferenceKind) -> impl Iterator<Item = &str> {
        self.0.get(&kind).into_iter().flatten().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    fn pairs(&self) -> impl Iterator<Item = (ReferenceKind, &str)> {
        self.0
            .iter()
            .flat_map(|(kind, names)| names.iter().map(move |n| (*kind, n.as_str())))
    }
}

pub(crate) fn collect_reference_names(products: &[CatalogProduct]) -> ReferenceNames {
    let mut names: BTreeMap<ReferenceKind, BTreeSet<String>> = BTreeMap::new();
    for product in products {
        for kind in ReferenceKind::ALL {
            for name in product_reference_names(product, kind) {
                names.entry(kind).or_default().insert(name.to_owned());
            }
        }
    }
    ReferenceNames(names)
}

/// Creates every missing reference entity, at most `max_concurrency` at a
/// time. Per-name failures are returned alongside the totals.
pub(crate) async fn upsert_references<S: ContentStore>(
    store: &S,
    names: &ReferenceNames,
    max_concurrency: usize,
) -> (ReferenceTotals, Vec<StageFailure>) {
    let results: Vec<_> = stream::iter(names.pairs())
        .map(|(kind, name)| {
            let fut = store.upsert_reference(kind, name.to_owned(), slugify(name));
            async move { (kind, name, fut.await) }
        })
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await;

    let mut totals = ReferenceTotals::default();
    let mut failures = Vec::new();
    for (kind, name, result) in results {
        match result {
            Ok(upsert) if upsert.created => {
                tracing::info!(kind = %kind, name, id = upsert.id, "created reference");
                totals.created += 1;
            }
            Ok(_) => totals.existing += 1,
            Err(e) => {
                totals.failed += 1;
                failures.push(StageFailure::new(
                    Stage::ReferenceUpsert,
                    format!("{kind} '{name}'"),
                    e,
                ));
            }
        }
    }
    (totals, failures)
}
