use crate::common::{DOC_ID, STORAGE_OPTION_SEPARATOR};
use crate::errors::{DocIndexError, DocIndexResult, ErrorKind};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Type of a record's identifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// A store-generated object id
    ObjectId,
    /// A caller-chosen string id
    String,
}

impl Display for IdKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IdKind::ObjectId => write!(f, "ObjectId"),
            IdKind::String => write!(f, "String"),
        }
    }
}

/// One stored field of a record type and its optional index directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    storage_name: String,
    directive: Option<String>,
}

impl FieldDescriptor {
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    pub fn directive(&self) -> Option<&str> {
        self.directive.as_deref()
    }
}

/// Static description of a record type: the collection it lives in, its
/// identifier field and every stored field in declaration order.
///
/// A descriptor is built once per record type, either by hand through
/// [`SchemaDescriptor::builder`] or by `#[derive(IndexedRecord)]`. Building
/// enforces the identifier convention: the first field is the identifier,
/// stored as `_id`, and holds an object id or a string.
///
/// Storage names may carry trailing options the way serializer renames often
/// do (`_id,omitempty`); everything from the first comma on is ignored.
///
/// # Examples
///
/// ```rust
/// use docindex::schema::{IdKind, SchemaDescriptor};
///
/// let schema = SchemaDescriptor::builder("user")
///     .id_field("_id,omitempty", IdKind::ObjectId)
///     .field("email", Some("unique"))
///     .field("nickname", None)
///     .build()?;
///
/// assert_eq!(schema.collection(), "user");
/// assert_eq!(schema.id_field().storage_name(), "_id");
/// assert_eq!(schema.indexed_fields().count(), 1);
/// # Ok::<(), docindex::errors::DocIndexError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    collection: String,
    id_kind: IdKind,
    fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    pub fn builder(collection: &str) -> SchemaDescriptorBuilder {
        SchemaDescriptorBuilder::new(collection)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id_kind(&self) -> IdKind {
        self.id_kind
    }

    pub fn id_field(&self) -> &FieldDescriptor {
        // build() guarantees the identifier is the first field
        &self.fields[0]
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields that carry an index directive, in declaration order.
    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.directive.is_some())
    }
}

/// A record type with a static schema descriptor.
///
/// Usually implemented with `#[derive(IndexedRecord)]` from `docindex_derive`.
pub trait IndexedRecord {
    /// Builds the descriptor of this record type.
    ///
    /// # Errors
    /// Returns a `SchemaConventionError` if the type breaks the identifier
    /// convention.
    fn schema() -> DocIndexResult<SchemaDescriptor>;
}

struct PendingField {
    name: String,
    directive: Option<String>,
    id_kind: Option<IdKind>,
}

/// Builder for [`SchemaDescriptor`].
///
/// Fields are recorded in call order. Validation happens in
/// [`build`](SchemaDescriptorBuilder::build).
pub struct SchemaDescriptorBuilder {
    collection: String,
    fields: Vec<PendingField>,
}

impl SchemaDescriptorBuilder {
    pub fn new(collection: &str) -> Self {
        SchemaDescriptorBuilder {
            collection: collection.to_string(),
            fields: Vec::new(),
        }
    }

    /// Declares the identifier field. It must be the first field.
    pub fn id_field(mut self, storage_name: &str, id_kind: IdKind) -> Self {
        self.fields.push(PendingField {
            name: storage_name.to_string(),
            directive: None,
            id_kind: Some(id_kind),
        });
        self
    }

    /// Declares a stored field with an optional index directive.
    pub fn field(mut self, storage_name: &str, directive: Option<&str>) -> Self {
        self.fields.push(PendingField {
            name: storage_name.to_string(),
            directive: directive.map(|raw| raw.to_string()),
            id_kind: None,
        });
        self
    }

    /// Validates the declaration and produces the descriptor.
    ///
    /// # Errors
    /// Returns a `SchemaConventionError` when the collection name is empty,
    /// when the first field is not an identifier stored as `_id`, when more
    /// than one identifier is declared, or when storage names are empty or
    /// repeated.
    pub fn build(self) -> DocIndexResult<SchemaDescriptor> {
        if self.collection.trim().is_empty() {
            return Err(convention_error("collection name cannot be empty".to_string()));
        }

        let id_kind = match self.fields.first() {
            Some(PendingField { id_kind: Some(kind), name, .. }) => {
                if storage_name(name) != DOC_ID {
                    return Err(convention_error(format!(
                        "{} identifier field is stored as '{}' instead of '{}'",
                        self.collection, name, DOC_ID
                    )));
                }
                *kind
            }
            Some(first) => {
                return Err(convention_error(format!(
                    "{} first field '{}' is not an ObjectId or String identifier",
                    self.collection, first.name
                )));
            }
            None => {
                return Err(convention_error(format!(
                    "{} declares no fields",
                    self.collection
                )));
            }
        };

        let mut seen = HashSet::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());
        for (position, field) in self.fields.into_iter().enumerate() {
            if position > 0 && field.id_kind.is_some() {
                return Err(convention_error(format!(
                    "{} declares a second identifier field '{}'",
                    self.collection, field.name
                )));
            }

            let name = storage_name(&field.name);
            if name.is_empty() {
                return Err(convention_error(format!(
                    "{} field at position {} has no storage name",
                    self.collection, position
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(convention_error(format!(
                    "{} stores more than one field as '{}'",
                    self.collection, name
                )));
            }

            fields.push(FieldDescriptor {
                storage_name: name.to_string(),
                directive: field.directive,
            });
        }

        Ok(SchemaDescriptor {
            collection: self.collection,
            id_kind,
            fields,
        })
    }
}

/// Storage name without trailing serializer options.
pub fn storage_name(declared: &str) -> &str {
    declared
        .split(STORAGE_OPTION_SEPARATOR)
        .next()
        .unwrap_or(declared)
        .trim()
}

fn convention_error(message: String) -> DocIndexError {
    log::error!("{}", message);
    DocIndexError::new(&message, ErrorKind::SchemaConventionError)
}
