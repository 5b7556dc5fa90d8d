use crate::index::{CanonicalIndex, CanonicalKey, IndexModel, RemoteIndex};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Classification of one local/remote index pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexStatus {
    /// Both sides have the index with the same uniqueness
    Consistent,
    /// Declared locally, missing on the collection
    ToCreate,
    /// Present on the collection, no longer declared
    ToDrop,
    /// Both sides have the index but disagree on uniqueness
    UniqueMismatch,
}

impl Display for IndexStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexStatus::Consistent => write!(f, "consistent"),
            IndexStatus::ToCreate => write!(f, "to be created"),
            IndexStatus::ToDrop => write!(f, "to be dropped"),
            IndexStatus::UniqueMismatch => write!(f, "unique inconsistent"),
        }
    }
}

/// One row of a [`ReconcilePlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    key: CanonicalKey,
    status: IndexStatus,
    local: Option<IndexModel>,
    remote: Option<RemoteIndex>,
}

impl PlanEntry {
    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }

    pub fn status(&self) -> IndexStatus {
        self.status
    }

    /// The declared model, absent for drop candidates.
    pub fn local(&self) -> Option<&IndexModel> {
        self.local.as_ref()
    }

    /// The catalog index, absent for create candidates.
    pub fn remote(&self) -> Option<&RemoteIndex> {
        self.remote.as_ref()
    }
}

impl Display for PlanEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.key, self.status)
    }
}

/// Result of diffing the declared indexes of a collection against its
/// catalog, keyed by [`CanonicalKey`].
///
/// Remote indexes are classified first, in catalog order, followed by the
/// create candidates in declaration order. Declared models that share a
/// canonical key collapse into one: the later declaration wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    collection: String,
    collection_exists: bool,
    entries: Vec<PlanEntry>,
}

impl ReconcilePlan {
    /// Plan for a collection that exists with the given catalog.
    pub fn diff(collection: &str, local: &[IndexModel], remote: &[RemoteIndex]) -> ReconcilePlan {
        let local = canonical_local_set(collection, local);
        let mut entries = Vec::with_capacity(local.len() + remote.len());

        for remote_index in remote {
            let key = remote_index.canonical_key();
            let entry = match local.get(&key) {
                None => PlanEntry {
                    key,
                    status: IndexStatus::ToDrop,
                    local: None,
                    remote: Some(remote_index.clone()),
                },
                Some(model) => {
                    let status = if model.is_unique() == remote_index.is_unique() {
                        IndexStatus::Consistent
                    } else {
                        IndexStatus::UniqueMismatch
                    };
                    PlanEntry {
                        key,
                        status,
                        local: Some(model.clone()),
                        remote: Some(remote_index.clone()),
                    }
                }
            };
            entries.push(entry);
        }

        let remote_keys: HashSet<CanonicalKey> =
            remote.iter().map(|index| index.canonical_key()).collect();
        for (key, model) in local {
            if !remote_keys.contains(&key) {
                entries.push(PlanEntry {
                    key,
                    status: IndexStatus::ToCreate,
                    local: Some(model),
                    remote: None,
                });
            }
        }

        ReconcilePlan {
            collection: collection.to_string(),
            collection_exists: true,
            entries,
        }
    }

    /// Plan for a collection that does not exist yet: every declared index
    /// is a create candidate.
    pub fn for_missing_collection(collection: &str, local: &[IndexModel]) -> ReconcilePlan {
        let entries = canonical_local_set(collection, local)
            .into_iter()
            .map(|(key, model)| PlanEntry {
                key,
                status: IndexStatus::ToCreate,
                local: Some(model),
                remote: None,
            })
            .collect();

        ReconcilePlan {
            collection: collection.to_string(),
            collection_exists: false,
            entries,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn collection_exists(&self) -> bool {
        self.collection_exists
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn with_status(&self, status: IndexStatus) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(move |entry| entry.status == status)
    }

    /// Declared models to create, in plan order.
    pub fn to_create(&self) -> Vec<&IndexModel> {
        self.with_status(IndexStatus::ToCreate)
            .filter_map(|entry| entry.local())
            .collect()
    }

    /// Catalog indexes to drop, in plan order.
    pub fn to_drop(&self) -> Vec<&RemoteIndex> {
        self.with_status(IndexStatus::ToDrop)
            .filter_map(|entry| entry.remote())
            .collect()
    }

    pub fn mismatches(&self) -> Vec<&PlanEntry> {
        self.with_status(IndexStatus::UniqueMismatch).collect()
    }

    /// True when the collection exists and every pair is consistent.
    pub fn is_consistent(&self) -> bool {
        self.collection_exists
            && self
                .entries
                .iter()
                .all(|entry| entry.status == IndexStatus::Consistent)
    }
}

fn canonical_local_set(collection: &str, local: &[IndexModel]) -> IndexMap<CanonicalKey, IndexModel> {
    let mut set = IndexMap::with_capacity(local.len());
    for model in local {
        if let Some(previous) = set.insert(model.canonical_key(), model.clone()) {
            log::warn!(
                "`{}` collection, index {} replaces {} declared over the same fields",
                collection,
                model,
                previous
            );
        }
    }
    set
}
