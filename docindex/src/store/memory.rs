use super::{CollectionAdminProvider, IndexCatalogEntry};
use crate::common::ID_INDEX_NAME;
use crate::errors::{DocIndexError, DocIndexResult, ErrorKind};
use crate::index::IndexModel;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// In-memory implementation of the collection administration boundary.
///
/// # Purpose
/// `InMemoryStore` keeps an index catalog per collection and behaves the way
/// a document store does for the four administrative calls the reconciler
/// makes. It is suitable for tests, for dry runs against a snapshot of a
/// catalog, and for embedding where no external store is involved.
///
/// # Characteristics
/// - **Thread-Safe**: clones share one catalog guarded by a read-write lock
/// - **Implicit collections**: creating indexes creates the collection, which
///   always carries the `_id_` index
/// - **Store-like failures**: conflicting index names or keys, dropping `_id_`,
///   dropping an unknown index and listing an unknown collection all fail
/// - **Deterministic**: collections and indexes list in insertion order
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::default()),
        }
    }

    /// Creates an empty collection holding only the `_id_` index.
    pub fn create_collection(&self, collection: &str) {
        self.inner.create_collection(collection)
    }

    /// Appends a raw catalog entry, creating the collection if needed. No
    /// validation is performed, so tests can seed catalogs a store would not
    /// produce itself.
    pub fn insert_catalog_entry(&self, collection: &str, entry: IndexCatalogEntry) {
        self.inner.insert_catalog_entry(collection, entry)
    }

    pub fn has_collection(&self, collection: &str) -> bool {
        self.inner.collections.read().contains_key(collection)
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collections.read().keys().cloned().collect()
    }

    /// Names of the indexes of a collection, empty if it does not exist.
    pub fn index_names(&self, collection: &str) -> Vec<String> {
        self.inner
            .collections
            .read()
            .get(collection)
            .map(|entries| entries.iter().map(|entry| entry.name().to_string()).collect())
            .unwrap_or_default()
    }
}

impl CollectionAdminProvider for InMemoryStore {
    fn exists_collection(&self, collection: &str) -> DocIndexResult<bool> {
        Ok(self.has_collection(collection))
    }

    fn list_indexes(&self, collection: &str) -> DocIndexResult<Vec<IndexCatalogEntry>> {
        self.inner.list_indexes(collection)
    }

    fn create_indexes(&self, collection: &str, models: &[IndexModel]) -> DocIndexResult<()> {
        self.inner.create_indexes(collection, models)
    }

    fn drop_index(&self, collection: &str, index_name: &str) -> DocIndexResult<()> {
        self.inner.drop_index(collection, index_name)
    }
}

#[derive(Default)]
struct InMemoryStoreInner {
    collections: RwLock<IndexMap<String, Vec<IndexCatalogEntry>>>,
}

impl InMemoryStoreInner {
    fn create_collection(&self, collection: &str) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_insert_with(|| vec![IndexCatalogEntry::id_index()]);
    }

    fn insert_catalog_entry(&self, collection: &str, entry: IndexCatalogEntry) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_insert_with(|| vec![IndexCatalogEntry::id_index()])
            .push(entry);
    }

    fn list_indexes(&self, collection: &str) -> DocIndexResult<Vec<IndexCatalogEntry>> {
        match self.collections.read().get(collection) {
            Some(entries) => Ok(entries.clone()),
            None => {
                log::error!("Collection `{}` does not exist", collection);
                Err(DocIndexError::new(
                    &format!("collection `{}` does not exist", collection),
                    ErrorKind::StoreIOError,
                ))
            }
        }
    }

    fn create_indexes(&self, collection: &str, models: &[IndexModel]) -> DocIndexResult<()> {
        let mut collections = self.collections.write();
        let existing = collections
            .get(collection)
            .cloned()
            .unwrap_or_else(|| vec![IndexCatalogEntry::id_index()]);

        // validate the whole batch before touching the catalog
        let mut staged = existing;
        for model in models {
            let candidate = IndexCatalogEntry::from_model(model);
            if let Some(current) = staged
                .iter()
                .find(|entry| entry.name() == candidate.name() || entry.key() == candidate.key())
            {
                if *current == candidate {
                    continue;
                }
                log::error!(
                    "Index {} conflicts with existing index {} on `{}`",
                    candidate.name(),
                    current.name(),
                    collection
                );
                return Err(DocIndexError::new(
                    &format!(
                        "collection `{}`, index {} conflicts with existing index {}",
                        collection,
                        candidate.name(),
                        current.name()
                    ),
                    ErrorKind::StoreIOError,
                ));
            }
            staged.push(candidate);
        }

        collections.insert(collection.to_string(), staged);
        Ok(())
    }

    fn drop_index(&self, collection: &str, index_name: &str) -> DocIndexResult<()> {
        let mut collections = self.collections.write();
        let entries = match collections.get_mut(collection) {
            Some(entries) => entries,
            None => {
                log::error!("Cannot drop index {} of missing collection `{}`", index_name, collection);
                return Err(DocIndexError::new(
                    &format!("collection `{}` does not exist", collection),
                    ErrorKind::StoreIOError,
                ));
            }
        };

        if index_name == ID_INDEX_NAME {
            log::error!("Cannot drop {} index of `{}`", ID_INDEX_NAME, collection);
            return Err(DocIndexError::new(
                &format!("collection `{}`, cannot drop {} index", collection, ID_INDEX_NAME),
                ErrorKind::StoreIOError,
            ));
        }

        match entries.iter().position(|entry| entry.name() == index_name) {
            Some(position) => {
                entries.remove(position);
                Ok(())
            }
            None => {
                log::error!("Index {} not found on `{}`", index_name, collection);
                Err(DocIndexError::new(
                    &format!("collection `{}`, index not found with name {}", collection, index_name),
                    ErrorKind::StoreIOError,
                ))
            }
        }
    }
}
