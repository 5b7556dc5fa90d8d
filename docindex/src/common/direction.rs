use std::fmt::{Display, Formatter};

/// Specifies the key direction of one field inside an index.
///
/// # Purpose
/// Document stores describe each indexed field with a numeric direction:
/// `1` for ascending and `-1` for descending. `IndexDirection` is the typed
/// form of that number, shared by local index models and by indexes read back
/// from the store catalog.
///
/// # Characteristics
/// - **Copy**: Can be copied instead of cloned
/// - **Collapsing**: Any number other than `-1` is read as ascending, which is
///   how directive values such as `single=5` or `groupseq=2` resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexDirection {
    /// Ascending key order (`1`)
    Ascending,
    /// Descending key order (`-1`)
    Descending,
}

impl IndexDirection {
    /// Resolves a declared direction value. `-1` is descending, everything
    /// else collapses to ascending.
    pub fn from_value(value: i64) -> IndexDirection {
        if value == -1 {
            IndexDirection::Descending
        } else {
            IndexDirection::Ascending
        }
    }

    /// Resolves a direction reported by a store catalog, where only `1` and
    /// `-1` are valid.
    pub fn from_catalog_value(value: i64) -> Option<IndexDirection> {
        match value {
            1 => Some(IndexDirection::Ascending),
            -1 => Some(IndexDirection::Descending),
            _ => None,
        }
    }

    /// Returns the numeric form of this direction.
    pub fn value(&self) -> i32 {
        match self {
            IndexDirection::Ascending => 1,
            IndexDirection::Descending => -1,
        }
    }
}

impl Default for IndexDirection {
    fn default() -> Self {
        IndexDirection::Ascending
    }
}

impl Display for IndexDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
