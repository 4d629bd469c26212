//! Author cards attached to listed resources

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use connect_model::UserSummary;
use connect_store::Store;

/// Look up the summary card of every id in `ids` with one scan.
///
/// Ids that no longer resolve are simply absent from the map.
pub(crate) async fn author_index<I>(store: &Store, ids: I) -> HashMap<Uuid, UserSummary>
where
    I: IntoIterator<Item = Uuid>,
{
    let wanted: HashSet<Uuid> = ids.into_iter().collect();
    if wanted.is_empty() {
        return HashMap::new();
    }
    store
        .users
        .find(|u| wanted.contains(&u.id))
        .await
        .into_iter()
        .map(|u| (u.id, u.summary()))
        .collect()
}

/// A resource awaiting admin review, with its author.
#[derive(Debug, Clone, Serialize)]
pub struct PendingItem<T> {
    #[serde(flatten)]
    pub item: T,
    pub author: Option<UserSummary>,
}
