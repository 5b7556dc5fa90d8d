//! Collection administration boundary.
//!
//! The reconciler never talks to a document store directly. It goes through
//! a [`CollectionAdminProvider`], which answers four questions: does the
//! collection exist, which indexes does it have, create these indexes, drop
//! this index. A driver adapter implements the trait once; [`InMemoryStore`]
//! is the implementation shipped with this crate.
//!
//! ```rust
//! use docindex::common::IndexDirection;
//! use docindex::index::IndexModel;
//! use docindex::store::{CollectionAdmin, CollectionHandle, InMemoryStore};
//!
//! let admin = CollectionAdmin::new(InMemoryStore::new());
//! let users = CollectionHandle::new("user", admin);
//! assert!(!users.exists()?);
//!
//! users.create_indexes(&[IndexModel::single("email", IndexDirection::Ascending, true)])?;
//! assert!(users.exists()?);
//! assert_eq!(users.list_indexes()?.len(), 2); // `_id_` and `email_1`
//! # Ok::<(), docindex::errors::DocIndexError>(())
//! ```

mod catalog;
mod memory;

pub use catalog::*;
pub use memory::*;

use crate::config::Deadline;
use crate::errors::DocIndexResult;
use crate::index::IndexModel;
use std::ops::Deref;
use std::sync::Arc;

/// Administrative capability a document store exposes to the reconciler.
///
/// Implementations must be thread-safe. Each call is blocking and runs to
/// completion or failure; failures are returned unmodified to the caller.
pub trait CollectionAdminProvider: Send + Sync {
    /// Whether a collection with this name exists.
    fn exists_collection(&self, collection: &str) -> DocIndexResult<bool>;

    /// Raw index catalog of a collection, including the implicit `_id_` index.
    fn list_indexes(&self, collection: &str) -> DocIndexResult<Vec<IndexCatalogEntry>>;

    /// Creates indexes, implicitly creating the collection if needed.
    fn create_indexes(&self, collection: &str, models: &[IndexModel]) -> DocIndexResult<()>;

    /// Drops one index by name.
    fn drop_index(&self, collection: &str, index_name: &str) -> DocIndexResult<()>;
}

/// Shareable handle to a [`CollectionAdminProvider`].
///
/// Cloning is cheap; all clones talk to the same provider.
#[derive(Clone)]
pub struct CollectionAdmin {
    inner: Arc<dyn CollectionAdminProvider>,
}

impl CollectionAdmin {
    pub fn new<T: CollectionAdminProvider + 'static>(inner: T) -> Self {
        CollectionAdmin { inner: Arc::new(inner) }
    }
}

impl Deref for CollectionAdmin {
    type Target = Arc<dyn CollectionAdminProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// A named collection bound to an admin provider and, optionally, to the
/// deadline of the current run.
///
/// Every call checks the deadline before reaching the provider.
#[derive(Clone)]
pub struct CollectionHandle {
    name: String,
    admin: CollectionAdmin,
    deadline: Deadline,
}

impl CollectionHandle {
    pub fn new(name: &str, admin: CollectionAdmin) -> Self {
        CollectionHandle {
            name: name.to_string(),
            admin,
            deadline: Deadline::none(),
        }
    }

    /// Returns a handle to the same collection bound to `deadline`.
    pub fn with_deadline(&self, deadline: Deadline) -> Self {
        CollectionHandle {
            name: self.name.clone(),
            admin: self.admin.clone(),
            deadline,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin(&self) -> &CollectionAdmin {
        &self.admin
    }

    pub fn exists(&self) -> DocIndexResult<bool> {
        self.deadline.check("checking existence", &self.name)?;
        self.admin.exists_collection(&self.name)
    }

    pub fn list_indexes(&self) -> DocIndexResult<Vec<IndexCatalogEntry>> {
        self.deadline.check("listing indexes", &self.name)?;
        self.admin.list_indexes(&self.name)
    }

    pub fn create_indexes(&self, models: &[IndexModel]) -> DocIndexResult<()> {
        self.deadline.check("creating indexes", &self.name)?;
        self.admin.create_indexes(&self.name, models)
    }

    pub fn drop_index(&self, index_name: &str) -> DocIndexResult<()> {
        self.deadline.check("dropping an index", &self.name)?;
        self.admin.drop_index(&self.name, index_name)
    }
}
