use crate::common::{IndexDirection, INDEX_NAME_SEPARATOR, UNIQUE_GROUP_PREFIX};
use crate::index::{CanonicalIndex, CanonicalKey};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// One field of an index key together with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexField {
    name: String,
    direction: IndexDirection,
}

impl IndexField {
    pub fn new(name: &str, direction: IndexDirection) -> Self {
        IndexField {
            name: name.to_string(),
            direction,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> IndexDirection {
        self.direction
    }
}

impl Display for IndexField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.name, INDEX_NAME_SEPARATOR, self.direction)
    }
}

/// A locally declared index, ready to be compared with the store catalog and
/// created on a collection.
///
/// # Variants
/// - `Single`: a standalone index over one field, produced by a field whose
///   directive asks for one (`single`, or any field without a group)
/// - `Compound`: an index over every field sharing a directive `group`, with
///   the key ordered by each field's declared `groupseq`
///
/// # Uniqueness
/// A single index is unique when its field's directive says `unique`. A
/// compound index is unique when its group name starts with `unique`; the
/// per-field `unique` flag plays no part for groups.
///
/// # Examples
///
/// ```rust
/// use docindex::common::IndexDirection;
/// use docindex::index::{IndexField, IndexModel};
///
/// let single = IndexModel::single("email", IndexDirection::Ascending, true);
/// assert_eq!(single.default_name(), "email_1");
///
/// let compound = IndexModel::compound(
///     "uniqueName",
///     vec![
///         IndexField::new("last", IndexDirection::Ascending),
///         IndexField::new("first", IndexDirection::Descending),
///     ],
/// );
/// assert!(compound.is_unique());
/// assert_eq!(compound.default_name(), "last_1_first_-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexModel {
    Single {
        field: IndexField,
        unique: bool,
    },
    Compound {
        group: String,
        fields: Vec<IndexField>,
        unique: bool,
    },
}

impl IndexModel {
    /// Creates a standalone index over one field.
    pub fn single(field: &str, direction: IndexDirection, unique: bool) -> Self {
        IndexModel::Single {
            field: IndexField::new(field, direction),
            unique,
        }
    }

    /// Creates a compound index for a group. Uniqueness follows the group
    /// naming convention.
    pub fn compound(group: &str, fields: Vec<IndexField>) -> Self {
        IndexModel::Compound {
            group: group.to_string(),
            fields,
            unique: is_unique_group(group),
        }
    }

    /// Ordered key fields of this index.
    pub fn fields(&self) -> &[IndexField] {
        match self {
            IndexModel::Single { field, .. } => std::slice::from_ref(field),
            IndexModel::Compound { fields, .. } => fields,
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(|field| field.name()).collect()
    }

    pub fn is_unique(&self) -> bool {
        match self {
            IndexModel::Single { unique, .. } => *unique,
            IndexModel::Compound { unique, .. } => *unique,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, IndexModel::Compound { .. })
    }

    /// Group name for compound indexes.
    pub fn group(&self) -> Option<&str> {
        match self {
            IndexModel::Single { .. } => None,
            IndexModel::Compound { group, .. } => Some(group),
        }
    }

    /// Name a store assigns to this index when none is given, e.g.
    /// `last_1_first_-1`.
    pub fn default_name(&self) -> String {
        self.fields().iter().join(INDEX_NAME_SEPARATOR)
    }
}

impl CanonicalIndex for IndexModel {
    fn canonical_key(&self) -> CanonicalKey {
        CanonicalKey::encode(self.field_names())
    }
}

impl Display for IndexModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let unique = if self.is_unique() { " unique" } else { "" };
        match self {
            IndexModel::Single { field, .. } => write!(f, "{{{}}}{}", field, unique),
            IndexModel::Compound { group, fields, .. } => {
                write!(f, "{}{{{}}}{}", group, fields.iter().join(", "), unique)
            }
        }
    }
}

/// True when a group name follows the unique naming convention.
pub fn is_unique_group(group: &str) -> bool {
    group.starts_with(UNIQUE_GROUP_PREFIX)
}
