use crate::config::ReconcileConfig;
use crate::errors::{DocIndexError, DocIndexResult, ErrorKind};
use crate::index_sync::IndexSync;
use crate::store::{CollectionAdmin, CollectionAdminProvider};
use std::time::Duration;

/// Builder for an [`IndexSync`] service.
///
/// Setters can be chained. A setter that fails does not interrupt the chain;
/// its error is kept and returned by [`build`](IndexSyncBuilder::build).
///
/// # Examples
///
/// ```rust
/// use docindex::store::InMemoryStore;
/// use docindex::IndexSync;
/// use std::time::Duration;
///
/// let sync = IndexSync::builder()
///     .auto_check(true)
///     .timeout(Duration::from_secs(30))
///     .admin(InMemoryStore::new())
///     .build()?;
///
/// assert!(sync.config().auto_check());
/// assert!(!sync.config().auto_update());
/// # Ok::<(), docindex::errors::DocIndexError>(())
/// ```
#[derive(Default)]
pub struct IndexSyncBuilder {
    error: Option<DocIndexError>,
    config: ReconcileConfig,
    admin: Option<CollectionAdmin>,
}

impl IndexSyncBuilder {
    pub fn new() -> Self {
        IndexSyncBuilder {
            error: None,
            config: ReconcileConfig::new(),
            admin: None,
        }
    }

    /// Uses an existing configuration instead of the builder's own. Settings
    /// applied before this call are discarded.
    pub fn config(mut self, config: ReconcileConfig) -> Self {
        self.config = config;
        self
    }

    pub fn auto_check(mut self, auto_check: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_auto_check(auto_check) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn auto_update(mut self, auto_update: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_auto_update(auto_update) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Bounds every reconciliation run. A zero timeout is an error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_timeout(timeout) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets the store the service administers.
    pub fn admin<T: CollectionAdminProvider + 'static>(mut self, provider: T) -> Self {
        self.admin = Some(CollectionAdmin::new(provider));
        self
    }

    /// Same as [`admin`](IndexSyncBuilder::admin) for an already shared handle.
    pub fn collection_admin(mut self, admin: CollectionAdmin) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Freezes the configuration and creates the service.
    ///
    /// # Errors
    /// The first error captured by a setter, or `InvalidOperation` if no
    /// store was given.
    pub fn build(self) -> DocIndexResult<IndexSync> {
        if let Some(error) = self.error {
            return Err(error);
        }

        match self.admin {
            Some(admin) => Ok(IndexSync::new(self.config, admin)),
            None => {
                log::error!("No collection admin provided to the index sync builder");
                Err(DocIndexError::new(
                    "No collection admin provided to the index sync builder",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }
}
