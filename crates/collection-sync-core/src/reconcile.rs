use crate::adder::MovieAdder;
use crate::diff::{missing_members, present_members, ClaimSet};
use crate::error::{FetchError, RunFailure};
use crate::snapshot::LibrarySnapshot;
use collection_sync_config::DetailFetch;
use collection_sync_models::Collection;
use collection_sync_sources::LibraryApi;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// What happened to one collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionOutcome {
    pub collection_id: i64,
    pub collection: String,
    pub members: usize,
    pub already_present: usize,
    pub added: usize,
    /// Missing, but another task (or an earlier member of this one) already claimed the title
    pub skipped_duplicate: usize,
    /// Missing titles that a dry run did not add
    pub would_add: usize,
    pub failures: Vec<RunFailure>,
}

/// Reconciles a single collection against the run's snapshot.
///
/// Everything it holds is shared read-only across tasks except the claim set.
pub struct CollectionReconciler {
    api: Arc<dyn LibraryApi>,
    snapshot: Arc<LibrarySnapshot>,
    adder: Arc<MovieAdder>,
    claims: Arc<ClaimSet>,
    detail_fetch: DetailFetch,
    dry_run: bool,
}

impl CollectionReconciler {
    pub fn new(
        api: Arc<dyn LibraryApi>,
        snapshot: Arc<LibrarySnapshot>,
        adder: Arc<MovieAdder>,
        claims: Arc<ClaimSet>,
    ) -> Self {
        Self {
            api,
            snapshot,
            adder,
            claims,
            detail_fetch: DetailFetch::default(),
            dry_run: false,
        }
    }

    pub fn with_detail_fetch(mut self, detail_fetch: DetailFetch) -> Self {
        self.detail_fetch = detail_fetch;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    async fn with_members(&self, listed: Collection) -> Result<Collection, FetchError> {
        let needs_detail = match self.detail_fetch {
            DetailFetch::Always => true,
            DetailFetch::WhenMissing => !listed.has_members(),
        };
        if !needs_detail {
            return Ok(listed);
        }

        self.api
            .get_collection(listed.id)
            .await
            .map_err(|source| FetchError::CollectionDetail {
                id: listed.id,
                title: listed.title.clone(),
                source,
            })
    }

    /// Add every member the snapshot doesn't hold. Additions run one at a time, in service order.
    ///
    /// Only the detail fetch can fail the whole collection; a failed addition is recorded in
    /// the outcome and the remaining members are still processed.
    #[instrument(skip(self, listed), fields(collection = %listed.title))]
    pub async fn reconcile(&self, listed: Collection) -> Result<CollectionOutcome, FetchError> {
        info!(operation = "collection_check", "Checking collection: {}", listed.title);

        let collection = self.with_members(listed).await?;
        let present = present_members(&collection, &self.snapshot);
        for movie in &present {
            debug!(title = %movie.title, "Movie already in library");
        }
        let missing = missing_members(&collection, &self.snapshot);

        let mut outcome = CollectionOutcome {
            collection_id: collection.id,
            collection: collection.title.clone(),
            members: collection.movies.len(),
            already_present: present.len(),
            ..CollectionOutcome::default()
        };

        for movie in missing {
            if !self.claims.claim(self.snapshot.key_for(movie)).await {
                debug!(title = %movie.title, "Already being added by another collection this run");
                outcome.skipped_duplicate += 1;
                continue;
            }

            if self.dry_run {
                info!(
                    operation = "movie_would_add",
                    title = %movie.title,
                    year = ?movie.year,
                    "Missing movie (dry run, not adding)"
                );
                outcome.would_add += 1;
                continue;
            }

            info!(title = %movie.title, "Missing movie, adding");
            match self.adder.add(self.api.as_ref(), movie).await {
                Ok(()) => outcome.added += 1,
                Err(e) => outcome.failures.push(RunFailure::add(&movie.title, &e)),
            }
        }

        if outcome.failures.is_empty() {
            debug!(
                added = outcome.added,
                already_present = outcome.already_present,
                "Collection reconciled"
            );
        } else {
            warn!(
                added = outcome.added,
                failed = outcome.failures.len(),
                "Collection reconciled with failures"
            );
        }

        Ok(outcome)
    }
}
