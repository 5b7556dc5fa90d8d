use crate::common::{DOC_ID, ID_INDEX_NAME};
use crate::index::IndexModel;

/// One raw entry of a collection's index catalog, in the shape a store
/// reports it: a name, the key as `(field, direction number)` pairs and an
/// optional `unique` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCatalogEntry {
    name: String,
    key: Vec<(String, i64)>,
    unique: Option<bool>,
}

impl IndexCatalogEntry {
    pub fn new(name: &str, key: Vec<(String, i64)>, unique: Option<bool>) -> Self {
        IndexCatalogEntry {
            name: name.to_string(),
            key,
            unique,
        }
    }

    /// Entry of the implicit primary-key index every collection carries.
    pub fn id_index() -> Self {
        IndexCatalogEntry::new(ID_INDEX_NAME, vec![(DOC_ID.to_string(), 1)], None)
    }

    /// Entry a store records when it creates `model` under its default name.
    pub fn from_model(model: &IndexModel) -> Self {
        let key = model
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), field.direction().value() as i64))
            .collect();
        let unique = if model.is_unique() { Some(true) } else { None };
        IndexCatalogEntry::new(&model.default_name(), key, unique)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &[(String, i64)] {
        &self.key
    }

    pub fn unique(&self) -> Option<bool> {
        self.unique
    }
}
