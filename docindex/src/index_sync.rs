use crate::config::ReconcileConfig;
use crate::errors::DocIndexResult;
use crate::index::{IndexModel, LocalIndexBuilder};
use crate::index_sync_builder::IndexSyncBuilder;
use crate::reconcile::{ReconcileOutcome, ReconcilePlan, Reconciler};
use crate::schema::{IndexedRecord, SchemaDescriptor};
use crate::store::{CollectionAdmin, CollectionHandle};
use std::sync::Arc;

/// Entry point for keeping collection indexes in line with record types.
///
/// An `IndexSync` owns a frozen [`ReconcileConfig`] and the
/// [`CollectionAdmin`] of one store. Every run it starts uses the same
/// policies, which replaces process-wide switches with one value passed
/// around explicitly. Clones share the same state.
///
/// # Examples
///
/// ```rust
/// use docindex::schema::{IdKind, SchemaDescriptor};
/// use docindex::store::InMemoryStore;
/// use docindex::IndexSync;
///
/// let store = InMemoryStore::new();
/// let sync = IndexSync::builder()
///     .auto_check(true)
///     .auto_update(true)
///     .admin(store.clone())
///     .build()?;
///
/// let schema = SchemaDescriptor::builder("user")
///     .id_field("_id,omitempty", IdKind::ObjectId)
///     .field("email", Some("unique"))
///     .build()?;
///
/// assert!(sync.init_descriptor(&schema)?);
/// assert!(!sync.init_descriptor(&schema)?);
/// assert_eq!(store.index_names("user"), vec!["_id_", "email_1"]);
/// # Ok::<(), docindex::errors::DocIndexError>(())
/// ```
#[derive(Clone)]
pub struct IndexSync {
    inner: Arc<IndexSyncInner>,
}

impl IndexSync {
    pub fn builder() -> IndexSyncBuilder {
        IndexSyncBuilder::new()
    }

    pub(crate) fn new(config: ReconcileConfig, admin: CollectionAdmin) -> Self {
        config.freeze();
        IndexSync {
            inner: Arc::new(IndexSyncInner { config, admin }),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.inner.config
    }

    pub fn admin(&self) -> &CollectionAdmin {
        &self.inner.admin
    }

    /// Initializes the collection of a record type.
    ///
    /// With `auto_check` off nothing is inspected and `false` is returned.
    /// Otherwise the type's descriptor is built and reconciled; the result
    /// says whether the collection was newly created.
    ///
    /// # Errors
    /// Schema convention and directive errors, and every fatal
    /// reconciliation error.
    pub fn init_model<T: IndexedRecord>(&self) -> DocIndexResult<bool> {
        if !self.inner.config.auto_check() {
            return Ok(false);
        }
        let schema = T::schema()?;
        self.inner.reconcile(&schema).map(|outcome| outcome.created())
    }

    /// Same as [`init_model`](IndexSync::init_model) for a descriptor built
    /// by hand.
    pub fn init_descriptor(&self, schema: &SchemaDescriptor) -> DocIndexResult<bool> {
        if !self.inner.config.auto_check() {
            return Ok(false);
        }
        self.inner.reconcile(schema).map(|outcome| outcome.created())
    }

    /// Reconciles the collection of a descriptor regardless of `auto_check`
    /// and returns the full outcome.
    pub fn ensure_indexes(&self, schema: &SchemaDescriptor) -> DocIndexResult<ReconcileOutcome> {
        self.inner.reconcile(schema)
    }

    /// Computes what reconciling the descriptor would do, without changing
    /// the store.
    pub fn plan(&self, schema: &SchemaDescriptor) -> DocIndexResult<ReconcilePlan> {
        let models = local_models(schema)?;
        let collection = self.inner.collection(schema.collection());
        self.inner.reconciler().plan(&collection, &models)
    }
}

struct IndexSyncInner {
    config: ReconcileConfig,
    admin: CollectionAdmin,
}

impl IndexSyncInner {
    fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.config.auto_update())
    }

    fn collection(&self, name: &str) -> CollectionHandle {
        CollectionHandle::new(name, self.admin.clone()).with_deadline(self.config.deadline())
    }

    fn reconcile(&self, schema: &SchemaDescriptor) -> DocIndexResult<ReconcileOutcome> {
        let models = local_models(schema)?;
        let collection = self.collection(schema.collection());
        let outcome = self.reconciler().reconcile(&collection, &models)?;
        if outcome.is_clean() {
            log::debug!("`{}` collection indexes reconciled", schema.collection());
        } else {
            log::warn!(
                "`{}` collection reconciled with {} failed change(s)",
                schema.collection(),
                outcome.failures().len()
            );
        }
        Ok(outcome)
    }
}

fn local_models(schema: &SchemaDescriptor) -> DocIndexResult<Vec<IndexModel>> {
    Ok(LocalIndexBuilder::from_schema(schema)?.build())
}
