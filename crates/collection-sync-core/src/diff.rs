// Diff computation between a collection's desired membership and the library snapshot

use crate::snapshot::LibrarySnapshot;
use collection_sync_models::{Collection, CollectionMovie};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::debug;

/// Members of `collection` whose key is absent from `snapshot`, in service order.
///
/// Each membership test is a hash lookup against keys computed once when the snapshot was built.
pub fn missing_members<'a>(collection: &'a Collection, snapshot: &LibrarySnapshot) -> Vec<&'a CollectionMovie> {
    let missing: Vec<&CollectionMovie> = collection
        .movies
        .iter()
        .filter(|movie| !snapshot.contains(movie))
        .collect();

    debug!(
        "missing_members: collection='{}', members={}, missing={}",
        collection.title,
        collection.movies.len(),
        missing.len()
    );

    missing
}

/// Members of `collection` the snapshot already holds, in service order
pub fn present_members<'a>(collection: &'a Collection, snapshot: &LibrarySnapshot) -> Vec<&'a CollectionMovie> {
    collection.movies.iter().filter(|movie| snapshot.contains(movie)).collect()
}

/// Keys claimed for creation during one run.
///
/// The snapshot can't see what sibling tasks are adding, so a title shared by two
/// collections would otherwise be created twice. The first task to claim a key issues
/// the call; later claims are refused.
#[derive(Debug, Default)]
pub struct ClaimSet {
    claimed: Mutex<HashSet<String>>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key was not yet claimed
    pub async fn claim(&self, key: String) -> bool {
        self.claimed.lock().await.insert(key)
    }

    pub async fn len(&self) -> usize {
        self.claimed.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claimed.lock().await.is_empty()
    }
}
