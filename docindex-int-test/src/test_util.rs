use docindex::errors::{DocIndexError, DocIndexResult, ErrorKind};
use docindex::index::IndexModel;
use docindex::store::{CollectionAdminProvider, IndexCatalogEntry, InMemoryStore};
use docindex::IndexSync;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Runs `test` on a context created by `before`, then `after` even if the
/// test failed. Panics with the first error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> DocIndexResult<()>,
    B: Fn() -> DocIndexResult<TestContext>,
    A: Fn(TestContext) -> DocIndexResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_result = test(ctx.clone());
    let after_result = after(ctx);
    if let Err(e) = test_result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

/// Store and store wrapper shared by one test.
#[derive(Clone)]
pub struct TestContext {
    store: InMemoryStore,
    failing: FailingStore,
}

impl TestContext {
    pub fn new(store: InMemoryStore) -> Self {
        let failing = FailingStore::new(store.clone());
        Self { store, failing }
    }

    /// The catalog itself, for seeding and assertions.
    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// The wrapper the service under test talks to.
    pub fn failing(&self) -> &FailingStore {
        &self.failing
    }

    pub fn sync(&self, auto_check: bool, auto_update: bool) -> DocIndexResult<IndexSync> {
        IndexSync::builder()
            .auto_check(auto_check)
            .auto_update(auto_update)
            .admin(self.failing.clone())
            .build()
    }

    pub fn sync_with_timeout(&self, auto_update: bool, timeout: Duration) -> DocIndexResult<IndexSync> {
        IndexSync::builder()
            .auto_check(true)
            .auto_update(auto_update)
            .timeout(timeout)
            .admin(self.failing.clone())
            .build()
    }
}

pub fn create_test_context() -> DocIndexResult<TestContext> {
    Ok(TestContext::new(InMemoryStore::new()))
}

pub fn cleanup(ctx: TestContext) -> DocIndexResult<()> {
    ctx.failing().reset();
    Ok(())
}

/// Seeds a catalog entry with ascending keys.
pub fn seed_index(store: &InMemoryStore, collection: &str, name: &str, fields: &[&str], unique: bool) {
    store.insert_catalog_entry(
        collection,
        IndexCatalogEntry::new(
            name,
            fields.iter().map(|field| (field.to_string(), 1)).collect(),
            if unique { Some(true) } else { None },
        ),
    );
}

/// Administrative call received by a [`FailingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCall {
    Exists(String),
    List(String),
    Create(String, Vec<String>),
    Drop(String, String),
}

impl AdminCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, AdminCall::Create(..) | AdminCall::Drop(..))
    }
}

/// Wraps an [`InMemoryStore`], records every call and fails the calls it
/// was told to fail.
#[derive(Clone)]
pub struct FailingStore {
    inner: InMemoryStore,
    state: Arc<Mutex<FailingState>>,
}

#[derive(Default)]
struct FailingState {
    calls: Vec<AdminCall>,
    fail_exists: bool,
    fail_list: bool,
    fail_create: HashSet<String>,
    fail_drop: HashSet<String>,
    delay: Option<Duration>,
}

impl FailingStore {
    pub fn new(inner: InMemoryStore) -> Self {
        FailingStore {
            inner,
            state: Arc::new(Mutex::new(FailingState::default())),
        }
    }

    pub fn fail_exists(&self) {
        self.state.lock().fail_exists = true;
    }

    pub fn fail_list(&self) {
        self.state.lock().fail_list = true;
    }

    /// Fails creation of the index with this default name.
    pub fn fail_create(&self, index_name: &str) {
        self.state.lock().fail_create.insert(index_name.to_string());
    }

    pub fn fail_drop(&self, index_name: &str) {
        self.state.lock().fail_drop.insert(index_name.to_string());
    }

    /// Delays every call by `delay`.
    pub fn delay(&self, delay: Duration) {
        self.state.lock().delay = Some(delay);
    }

    pub fn calls(&self) -> Vec<AdminCall> {
        self.state.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<AdminCall> {
        self.calls().into_iter().filter(|call| call.is_mutation()).collect()
    }

    pub fn reset(&self) {
        *self.state.lock() = FailingState::default();
    }

    fn record(&self, call: AdminCall) {
        let delay = {
            let mut state = self.state.lock();
            state.calls.push(call);
            state.delay
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
    }
}

fn injected(message: String) -> DocIndexError {
    DocIndexError::new(&message, ErrorKind::StoreIOError)
}

impl CollectionAdminProvider for FailingStore {
    fn exists_collection(&self, collection: &str) -> DocIndexResult<bool> {
        self.record(AdminCall::Exists(collection.to_string()));
        if self.state.lock().fail_exists {
            return Err(injected(format!("injected failure checking `{}`", collection)));
        }
        self.inner.exists_collection(collection)
    }

    fn list_indexes(&self, collection: &str) -> DocIndexResult<Vec<IndexCatalogEntry>> {
        self.record(AdminCall::List(collection.to_string()));
        if self.state.lock().fail_list {
            return Err(injected(format!("injected failure listing `{}`", collection)));
        }
        self.inner.list_indexes(collection)
    }

    fn create_indexes(&self, collection: &str, models: &[IndexModel]) -> DocIndexResult<()> {
        let names: Vec<String> = models.iter().map(|model| model.default_name()).collect();
        self.record(AdminCall::Create(collection.to_string(), names.clone()));
        let failing = {
            let state = self.state.lock();
            names.iter().find(|name| state.fail_create.contains(*name)).cloned()
        };
        if let Some(name) = failing {
            return Err(injected(format!("injected failure creating {} on `{}`", name, collection)));
        }
        self.inner.create_indexes(collection, models)
    }

    fn drop_index(&self, collection: &str, index_name: &str) -> DocIndexResult<()> {
        self.record(AdminCall::Drop(collection.to_string(), index_name.to_string()));
        if self.state.lock().fail_drop.contains(index_name) {
            return Err(injected(format!(
                "injected failure dropping {} on `{}`",
                index_name, collection
            )));
        }
        self.inner.drop_index(collection, index_name)
    }
}

/// Stand-in for a driver's object id type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectId([u8; 12]);
