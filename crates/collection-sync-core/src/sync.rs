use crate::adder::MovieAdder;
use crate::collections::CollectionLister;
use crate::diff::ClaimSet;
use crate::error::{CollectionError, FailureKind, ResolutionError, RunFailure, TaskError};
use crate::profile::ProfileResolver;
use crate::progress::ProgressTracker;
use crate::reconcile::{CollectionOutcome, CollectionReconciler};
use crate::retry::RetryPolicy;
use crate::snapshot::LibrarySnapshot;
use chrono::{DateTime, Utc};
use collection_sync_config::{Config, DetailFetch, MatchKey, SnapshotFailurePolicy};
use collection_sync_models::{Collection, QualityProfile};
use collection_sync_sources::LibraryApi;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{error, info, instrument, warn};

/// Everything a pass needs besides the service itself
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub quality_profile: String,
    pub root_folder_path: String,
    pub concurrency: usize,
    pub match_key: MatchKey,
    pub detail_fetch: DetailFetch,
    pub on_snapshot_failure: SnapshotFailurePolicy,
    pub dry_run: bool,
    pub retry: RetryPolicy,
}

impl ReconcileSettings {
    pub fn new(quality_profile: impl Into<String>, root_folder_path: impl Into<String>) -> Self {
        Self {
            quality_profile: quality_profile.into(),
            root_folder_path: root_folder_path.into(),
            concurrency: 3,
            match_key: MatchKey::default(),
            detail_fetch: DetailFetch::default(),
            on_snapshot_failure: SnapshotFailurePolicy::default(),
            dry_run: false,
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            quality_profile: config.radarr.quality_profile.clone(),
            root_folder_path: config.radarr.root_folder_path.clone(),
            concurrency: config.reconcile.concurrency,
            match_key: config.reconcile.match_key,
            detail_fetch: config.reconcile.detail_fetch,
            on_snapshot_failure: config.reconcile.on_snapshot_failure,
            dry_run: config.reconcile.dry_run,
            retry: RetryPolicy::from_config(&config.retry),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_match_key(mut self, match_key: MatchKey) -> Self {
        self.match_key = match_key;
        self
    }

    pub fn with_detail_fetch(mut self, detail_fetch: DetailFetch) -> Self {
        self.detail_fetch = detail_fetch;
        self
    }

    pub fn with_snapshot_failure(mut self, policy: SnapshotFailurePolicy) -> Self {
        self.on_snapshot_failure = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Result of one pass, for logging and CLI output
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub dry_run: bool,
    pub snapshot_size: usize,
    pub collections_total: usize,
    pub collections_processed: usize,
    pub collections_failed: usize,
    pub titles_added: usize,
    pub titles_already_present: usize,
    pub titles_skipped_duplicate: usize,
    pub titles_would_add: usize,
    pub failures: Vec<RunFailure>,
}

impl RunSummary {
    fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::ZERO,
            dry_run,
            snapshot_size: 0,
            collections_total: 0,
            collections_processed: 0,
            collections_failed: 0,
            titles_added: 0,
            titles_already_present: 0,
            titles_skipped_duplicate: 0,
            titles_would_add: 0,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, outcome: CollectionOutcome) {
        self.collections_processed += 1;
        self.titles_added += outcome.added;
        self.titles_already_present += outcome.already_present;
        self.titles_skipped_duplicate += outcome.skipped_duplicate;
        self.titles_would_add += outcome.would_add;
        self.failures.extend(outcome.failures);
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &RunFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The reconciliation engine.
///
/// Construction resolves the quality profile, which is the only fatal step. After that,
/// [`Reconciler::run_once`] can be called any number of times; each pass rebuilds its
/// snapshot and keeps nothing afterwards.
pub struct Reconciler {
    api: Arc<dyn LibraryApi>,
    profile: QualityProfile,
    adder: Arc<MovieAdder>,
    settings: ReconcileSettings,
}

impl Reconciler {
    pub async fn connect(api: Arc<dyn LibraryApi>, settings: ReconcileSettings) -> Result<Self, ResolutionError> {
        let profile = ProfileResolver::new(api.as_ref(), settings.retry)
            .resolve(&settings.quality_profile)
            .await?;
        let adder = Arc::new(MovieAdder::new(&profile, settings.root_folder_path.clone()));

        Ok(Self {
            api,
            profile,
            adder,
            settings,
        })
    }

    pub fn quality_profile(&self) -> &QualityProfile {
        &self.profile
    }

    /// One reconciliation pass. Never fails: every error is recorded in the summary.
    #[instrument(skip(self), fields(service = self.api.service_name()))]
    pub async fn run_once(&self) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::new(self.settings.dry_run);

        info!(
            operation = "run_start",
            concurrency = self.settings.concurrency,
            dry_run = self.settings.dry_run,
            "Starting run"
        );

        if let Some(snapshot) = self.build_snapshot(&mut summary).await {
            summary.snapshot_size = snapshot.len();
            match CollectionLister::new(self.api.as_ref()).list().await {
                Ok(collections) => {
                    summary.collections_total = collections.len();
                    self.dispatch(collections, Arc::new(snapshot), &mut summary).await;
                }
                Err(e) => {
                    error!(operation = "collections_list", error = %e, "Error retrieving collections");
                    summary.failures.push(RunFailure::fetch("collections", &e));
                }
            }
        }

        summary.duration = start.elapsed();
        info!(
            operation = "run_complete",
            collections = summary.collections_processed,
            collections_failed = summary.collections_failed,
            added = summary.titles_added,
            already_present = summary.titles_already_present,
            failures = summary.failure_count(),
            duration_ms = summary.duration.as_millis() as u64,
            "Done running"
        );
        summary
    }

    async fn build_snapshot(&self, summary: &mut RunSummary) -> Option<LibrarySnapshot> {
        match LibrarySnapshot::fetch(self.api.as_ref(), self.settings.match_key).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                summary.failures.push(RunFailure::fetch("library", &e));
                match self.settings.on_snapshot_failure {
                    SnapshotFailurePolicy::TreatAsEmpty => {
                        warn!(
                            operation = "snapshot_failed",
                            error = %e,
                            "Library fetch failed, continuing with an empty snapshot"
                        );
                        Some(LibrarySnapshot::empty(self.settings.match_key))
                    }
                    SnapshotFailurePolicy::AbortRun => {
                        error!(operation = "snapshot_failed", error = %e, "Library fetch failed, aborting run");
                        None
                    }
                }
            }
        }
    }

    /// One task per collection, at most `concurrency` doing network work at once
    async fn dispatch(&self, collections: Vec<Collection>, snapshot: Arc<LibrarySnapshot>, summary: &mut RunSummary) {
        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency.max(1)));
        let reconciler = Arc::new(
            CollectionReconciler::new(self.api.clone(), snapshot, self.adder.clone(), Arc::new(ClaimSet::new()))
                .with_detail_fetch(self.settings.detail_fetch)
                .with_dry_run(self.settings.dry_run),
        );
        let mut tracker = ProgressTracker::for_total(collections.len());

        let mut pending: FuturesUnordered<_> = collections
            .into_iter()
            .map(|collection| {
                let title = collection.title.clone();
                let handle = tokio::spawn(run_task(reconciler.clone(), semaphore.clone(), collection));
                async move { (title, handle.await) }
            })
            .collect();

        while let Some((title, joined)) = pending.next().await {
            let result = joined
                .map_err(|e| CollectionError::from(task_error(&title, e)))
                .and_then(|r| r);

            match result {
                Ok(outcome) => {
                    tracker.record_completed();
                    summary.record(outcome);
                }
                Err(e) => {
                    let failure = RunFailure::collection(&title, &e);
                    tracker.record_failed(&format!("{:?}", failure.kind).to_lowercase());
                    warn!(
                        operation = "collection_failed",
                        collection = %title,
                        error = %e,
                        "Error checking collection"
                    );
                    summary.collections_failed += 1;
                    summary.failures.push(failure);
                }
            }
            tracker.log_progress();
        }

        tracker.log_summary("Reconciliation");
    }
}

async fn run_task(
    reconciler: Arc<CollectionReconciler>,
    semaphore: Arc<Semaphore>,
    collection: Collection,
) -> Result<CollectionOutcome, CollectionError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| TaskError::Cancelled {
            collection: collection.title.clone(),
        })?;
    Ok(reconciler.reconcile(collection).await?)
}

fn task_error(collection: &str, err: JoinError) -> TaskError {
    if err.is_panic() {
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_else(|| "unknown panic payload".to_string());
        TaskError::Panicked {
            collection: collection.to_string(),
            message,
        }
    } else {
        TaskError::Cancelled {
            collection: collection.to_string(),
        }
    }
}
