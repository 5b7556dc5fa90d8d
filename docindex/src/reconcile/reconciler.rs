use super::{IndexStatus, PlanEntry, ReconcilePlan};
use crate::errors::{DocIndexError, DocIndexResult, ErrorKind};
use crate::index::{IndexModel, RemoteIndexLister};
use crate::store::CollectionHandle;
use itertools::Itertools;

/// What a reconciliation run did to one collection.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    created: bool,
    plan: ReconcilePlan,
    failures: Vec<DocIndexError>,
}

impl ReconcileOutcome {
    pub fn collection(&self) -> &str {
        self.plan.collection()
    }

    /// Whether the collection did not exist and was materialized by this run.
    pub fn created(&self) -> bool {
        self.created
    }

    /// The plan the run acted on.
    pub fn plan(&self) -> &ReconcilePlan {
        &self.plan
    }

    pub fn entries(&self) -> &[PlanEntry] {
        self.plan.entries()
    }

    /// Create and drop calls that failed. They were logged and did not stop
    /// the run.
    pub fn failures(&self) -> &[DocIndexError] {
        &self.failures
    }

    /// True when every planned change was applied.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Brings the indexes of a collection in line with the declared models.
///
/// A run reads first (existence, catalog), decides on a [`ReconcilePlan`],
/// and only then acts. The safety gate works as follows:
///
/// - A uniqueness mismatch between a declared index and the catalog index over
///   the same fields always fails the run before anything is changed. Fixing
///   it requires rebuilding the index, which is an operator decision.
/// - With `auto_update` off, a missing collection, a missing index or an
///   undeclared index fails the run. Every offending index is logged first and
///   nothing is changed.
/// - With `auto_update` on, undeclared indexes are dropped and missing ones
///   created. A failing create or drop is logged, recorded in the outcome, and
///   the run moves on to the next candidate.
///
/// # Examples
///
/// ```rust
/// use docindex::common::IndexDirection;
/// use docindex::index::IndexModel;
/// use docindex::reconcile::Reconciler;
/// use docindex::store::{CollectionAdmin, CollectionHandle, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// let users = CollectionHandle::new("user", CollectionAdmin::new(store.clone()));
/// let local = vec![IndexModel::single("email", IndexDirection::Ascending, true)];
///
/// // nothing exists yet and updates are forbidden
/// assert!(Reconciler::new(false).reconcile(&users, &local).is_err());
///
/// let outcome = Reconciler::new(true).reconcile(&users, &local)?;
/// assert!(outcome.created());
/// assert_eq!(store.index_names("user"), vec!["_id_", "email_1"]);
/// # Ok::<(), docindex::errors::DocIndexError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    auto_update: bool,
}

impl Reconciler {
    pub fn new(auto_update: bool) -> Self {
        Reconciler { auto_update }
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// Computes the plan for a collection using read calls only. The safety
    /// gate is not applied.
    ///
    /// # Errors
    /// Store and catalog decoding errors.
    pub fn plan(&self, collection: &CollectionHandle, local: &[IndexModel]) -> DocIndexResult<ReconcilePlan> {
        if !collection.exists()? {
            return Ok(ReconcilePlan::for_missing_collection(collection.name(), local));
        }

        let remote = RemoteIndexLister::list(collection)?;
        let plan = ReconcilePlan::diff(collection.name(), local, &remote);
        log::debug!(
            "`{}` collection plan: {}",
            collection.name(),
            plan.entries().iter().join(", ")
        );
        Ok(plan)
    }

    /// Reconciles a collection with the declared models.
    ///
    /// # Errors
    /// - `PendingCreation` / `PendingDrop` when changes are needed and
    ///   `auto_update` is off
    /// - `UniqueMismatch` whenever uniqueness disagrees
    /// - store errors from the existence check or catalog listing, and from
    ///   the batch create of a new collection
    /// - `Timeout` when the handle's deadline expires
    pub fn reconcile(
        &self,
        collection: &CollectionHandle,
        local: &[IndexModel],
    ) -> DocIndexResult<ReconcileOutcome> {
        let plan = self.plan(collection, local)?;

        if !plan.collection_exists() {
            return self.create_collection(collection, plan);
        }

        self.check_unique(&plan)?;
        if !self.auto_update {
            self.check_pending(&plan)?;
            return Ok(ReconcileOutcome {
                created: false,
                plan,
                failures: Vec::new(),
            });
        }

        let mut failures = Vec::new();
        for remote in plan.to_drop() {
            log::info!(
                "`{}` collection, index to be dropped: {}",
                collection.name(),
                remote
            );
            if let Err(err) = collection.drop_index(remote.name()) {
                failures.push(apply_failure(collection.name(), "drop", remote.name(), err)?);
            }
        }

        for model in plan.to_create() {
            log::info!(
                "`{}` collection, index to be created: {}",
                collection.name(),
                model
            );
            if let Err(err) = collection.create_indexes(std::slice::from_ref(model)) {
                failures.push(apply_failure(collection.name(), "create", &model.default_name(), err)?);
            }
        }

        Ok(ReconcileOutcome {
            created: false,
            plan,
            failures,
        })
    }

    fn create_collection(
        &self,
        collection: &CollectionHandle,
        plan: ReconcilePlan,
    ) -> DocIndexResult<ReconcileOutcome> {
        if !self.auto_update {
            log::error!("remote collection `{}`, to be created", collection.name());
            return Err(DocIndexError::new(
                &format!("remote collection `{}`, to be created", collection.name()),
                ErrorKind::PendingCreation,
            ));
        }

        let models: Vec<IndexModel> = plan.to_create().into_iter().cloned().collect();
        if !models.is_empty() {
            log::info!(
                "`{}` collection, creating {} index(es) on new collection",
                collection.name(),
                models.len()
            );
            collection.create_indexes(&models)?;
        }

        Ok(ReconcileOutcome {
            created: true,
            plan,
            failures: Vec::new(),
        })
    }

    fn check_unique(&self, plan: &ReconcilePlan) -> DocIndexResult<()> {
        let mismatches = plan.mismatches();
        if mismatches.is_empty() {
            return Ok(());
        }

        for entry in &mismatches {
            log::error!(
                "`{}` collection, index.unique inconsistent: {}",
                plan.collection(),
                entry.key()
            );
        }
        Err(DocIndexError::new(
            &format!(
                "`{}` collection, index.unique inconsistent: {}",
                plan.collection(),
                mismatches.iter().map(|entry| entry.key()).join(", ")
            ),
            ErrorKind::UniqueMismatch,
        ))
    }

    fn check_pending(&self, plan: &ReconcilePlan) -> DocIndexResult<()> {
        let to_drop: Vec<_> = plan.with_status(IndexStatus::ToDrop).map(|e| e.key()).collect();
        let to_create: Vec<_> = plan.with_status(IndexStatus::ToCreate).map(|e| e.key()).collect();
        if to_drop.is_empty() && to_create.is_empty() {
            return Ok(());
        }

        for key in &to_drop {
            log::error!("`{}` collection, index to be dropped: {}", plan.collection(), key);
        }
        for key in &to_create {
            log::error!("`{}` collection, index to be created: {}", plan.collection(), key);
        }

        let mut parts = Vec::new();
        if !to_drop.is_empty() {
            parts.push(format!("indexes to be dropped: {}", to_drop.iter().join(", ")));
        }
        if !to_create.is_empty() {
            parts.push(format!("indexes to be created: {}", to_create.iter().join(", ")));
        }
        let kind = if to_drop.is_empty() {
            ErrorKind::PendingCreation
        } else {
            ErrorKind::PendingDrop
        };
        Err(DocIndexError::new(
            &format!("`{}` collection, {}", plan.collection(), parts.join("; ")),
            kind,
        ))
    }
}

/// Wraps a failed create/drop as a logged `ApplyError`. An expired deadline
/// is not absorbed: it ends the run.
fn apply_failure(
    collection: &str,
    operation: &str,
    index_name: &str,
    err: DocIndexError,
) -> DocIndexResult<DocIndexError> {
    if err.kind() == &ErrorKind::Timeout {
        return Err(err);
    }
    log::error!(
        "`{}` collection, failed to {} index {}: {}",
        collection,
        operation,
        index_name,
        err
    );
    Ok(DocIndexError::new_with_cause(
        &format!("`{}` collection, failed to {} index {}", collection, operation, index_name),
        ErrorKind::ApplyError,
        err,
    ))
}
