use crate::common::{IndexDirection, ID_INDEX_NAME, INDEX_NAME_SEPARATOR};
use crate::errors::{DocIndexError, DocIndexResult, ErrorKind};
use crate::index::{CanonicalIndex, CanonicalKey};
use crate::store::{CollectionHandle, IndexCatalogEntry};
use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// An index as it exists on a live collection.
///
/// # Characteristics
/// - **Ordered key**: field order is kept exactly as the catalog reports it
/// - **Named**: the name is what the store needs to drop the index
/// - **Decoded**: directions are always valid, a missing `unique` flag reads as `false`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteIndex {
    name: String,
    key: IndexMap<String, IndexDirection>,
    unique: bool,
}

impl RemoteIndex {
    pub fn new(name: &str, key: IndexMap<String, IndexDirection>, unique: bool) -> Self {
        RemoteIndex {
            name: name.to_string(),
            key,
            unique,
        }
    }

    /// Decodes one catalog entry.
    ///
    /// # Errors
    /// Returns an `EncodingError` when the entry has no name, no key fields,
    /// or a key direction other than `1` or `-1`.
    pub fn from_catalog_entry(collection: &str, entry: &IndexCatalogEntry) -> DocIndexResult<Self> {
        if entry.name().is_empty() {
            log::error!("Index catalog entry of `{}` has no name", collection);
            return Err(DocIndexError::new(
                &format!("collection `{}`, index catalog entry without name", collection),
                ErrorKind::EncodingError,
            ));
        }

        if entry.key().is_empty() {
            log::error!("Index {} of `{}` has an empty key", entry.name(), collection);
            return Err(DocIndexError::new(
                &format!("collection `{}`, index {} has an empty key", collection, entry.name()),
                ErrorKind::EncodingError,
            ));
        }

        let mut key = IndexMap::with_capacity(entry.key().len());
        for (field, value) in entry.key() {
            match IndexDirection::from_catalog_value(*value) {
                Some(direction) => {
                    key.insert(field.clone(), direction);
                }
                None => {
                    log::error!(
                        "Index {} of `{}` has unsupported direction {} on field {}",
                        entry.name(),
                        collection,
                        value,
                        field
                    );
                    return Err(DocIndexError::new(
                        &format!(
                            "collection `{}`, index {} has unsupported direction {} on field {}",
                            collection,
                            entry.name(),
                            value,
                            field
                        ),
                        ErrorKind::EncodingError,
                    ));
                }
            }
        }

        Ok(RemoteIndex::new(entry.name(), key, entry.unique().unwrap_or(false)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &IndexMap<String, IndexDirection> {
        &self.key
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.key.keys().map(|name| name.as_str()).collect()
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Whether this is the store's implicit primary-key index.
    pub fn is_id_index(&self) -> bool {
        self.name == ID_INDEX_NAME
    }
}

impl CanonicalIndex for RemoteIndex {
    fn canonical_key(&self) -> CanonicalKey {
        CanonicalKey::encode(self.key.keys())
    }
}

impl Display for RemoteIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let key = self
            .key
            .iter()
            .map(|(field, direction)| format!("{}{}{}", field, INDEX_NAME_SEPARATOR, direction))
            .join(", ");
        let unique = if self.unique { " unique" } else { "" };
        write!(f, "{}{{{}}}{}", self.name, key, unique)
    }
}

/// Reads the indexes that currently exist on a collection.
pub struct RemoteIndexLister;

impl RemoteIndexLister {
    /// Lists and decodes the catalog of `collection`, leaving out the
    /// implicit `_id_` index.
    ///
    /// # Errors
    /// Store and decoding errors are returned as they are, without retry.
    pub fn list(collection: &CollectionHandle) -> DocIndexResult<Vec<RemoteIndex>> {
        let entries = collection.list_indexes()?;

        let mut indexes = Vec::with_capacity(entries.len());
        for entry in &entries {
            if entry.name() == ID_INDEX_NAME {
                continue;
            }
            indexes.push(RemoteIndex::from_catalog_entry(collection.name(), entry)?);
        }

        log::debug!(
            "Collection `{}` reports {} index(es) besides {}",
            collection.name(),
            indexes.len(),
            ID_INDEX_NAME
        );
        Ok(indexes)
    }
}
