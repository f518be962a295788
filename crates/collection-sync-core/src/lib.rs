pub mod sync;
pub mod diff;
pub mod error;
pub mod retry;
pub mod profile;
pub mod snapshot;
pub mod collections;
pub mod adder;
pub mod reconcile;
pub mod progress;

#[cfg(test)]
pub(crate) mod testing;

pub use diff::{missing_members, present_members, ClaimSet};
pub use error::{AddError, CollectionError, FailureKind, FetchError, ResolutionError, RunFailure, TaskError};
pub use retry::{RetryDelay, RetryExhausted, RetryPolicy};
pub use profile::ProfileResolver;
pub use snapshot::LibrarySnapshot;
pub use collections::CollectionLister;
pub use adder::MovieAdder;
pub use reconcile::{CollectionOutcome, CollectionReconciler};
pub use sync::{ReconcileSettings, Reconciler, RunSummary};
