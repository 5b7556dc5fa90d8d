//! Reconciliation policy configuration.

use crate::errors::{DocIndexError, DocIndexResult, ErrorKind};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Policy switches for index reconciliation.
///
/// - `auto_check`: whether initializing a model reconciles its collection at all
/// - `auto_update`: whether the reconciler may create and drop indexes, or must
///   instead fail and leave the store untouched
/// - `timeout`: optional bound on a whole reconciliation run
///
/// Settings can be changed until the configuration is handed to an
/// [`IndexSync`](crate::IndexSync); from then on it is read-only. Cloning is
/// cheap and every clone shares the same state.
///
/// # Examples
///
/// ```rust
/// use docindex::config::ReconcileConfig;
///
/// let config = ReconcileConfig::new();
/// config.set_auto_check(true)?;
/// config.set_auto_update(true)?;
/// assert!(config.auto_check());
/// assert!(config.auto_update());
/// assert!(config.timeout().is_none());
/// # Ok::<(), docindex::errors::DocIndexError>(())
/// ```
#[derive(Clone)]
pub struct ReconcileConfig {
    inner: Arc<ReconcileConfigInner>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconcileConfig {
    /// Creates a configuration with both switches off and no timeout.
    pub fn new() -> Self {
        ReconcileConfig {
            inner: Arc::new(ReconcileConfigInner::new()),
        }
    }

    pub fn auto_check(&self) -> bool {
        self.inner.auto_check.load(Ordering::Relaxed)
    }

    pub fn auto_update(&self) -> bool {
        self.inner.auto_update.load(Ordering::Relaxed)
    }

    pub fn timeout(&self) -> Option<Duration> {
        *self.inner.timeout.read()
    }

    /// Enables or disables reconciliation on model initialization.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is already in use.
    pub fn set_auto_check(&self, auto_check: bool) -> DocIndexResult<()> {
        self.inner.ensure_mutable("auto-check")?;
        self.inner.auto_check.store(auto_check, Ordering::Relaxed);
        Ok(())
    }

    /// Allows or forbids the reconciler to mutate the store.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is already in use.
    pub fn set_auto_update(&self, auto_update: bool) -> DocIndexResult<()> {
        self.inner.ensure_mutable("auto-update")?;
        self.inner.auto_update.store(auto_update, Ordering::Relaxed);
        Ok(())
    }

    /// Bounds each reconciliation run.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is already in use or the timeout is zero.
    pub fn set_timeout(&self, timeout: Duration) -> DocIndexResult<()> {
        self.inner.ensure_mutable("timeout")?;
        if timeout.is_zero() {
            log::error!("Reconciliation timeout cannot be zero");
            return Err(DocIndexError::new(
                "Reconciliation timeout cannot be zero",
                ErrorKind::InvalidOperation,
            ));
        }
        *self.inner.timeout.write() = Some(timeout);
        Ok(())
    }

    /// Whether the configuration is in use and read-only.
    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Relaxed)
    }

    /// Starts the deadline of one run.
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.timeout())
    }

    pub(crate) fn freeze(&self) {
        self.inner.frozen.store(true, Ordering::Relaxed);
    }
}

struct ReconcileConfigInner {
    auto_check: AtomicBool,
    auto_update: AtomicBool,
    timeout: RwLock<Option<Duration>>,
    frozen: AtomicBool,
}

impl ReconcileConfigInner {
    fn new() -> Self {
        ReconcileConfigInner {
            auto_check: AtomicBool::from(false),
            auto_update: AtomicBool::from(false),
            timeout: RwLock::new(None),
            frozen: AtomicBool::from(false),
        }
    }

    fn ensure_mutable(&self, setting: &str) -> DocIndexResult<()> {
        if self.frozen.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed once the configuration is in use", setting);
            return Err(DocIndexError::new(
                &format!("{} cannot be changed once the configuration is in use", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

/// Point in time after which no further external call of a run is made.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Deadline { expires_at: None }
    }

    /// A deadline `timeout` from now. A timeout too large to be represented
    /// as an instant never expires.
    pub fn after(timeout: Option<Duration>) -> Self {
        Deadline {
            expires_at: timeout.and_then(|timeout| Instant::now().checked_add(timeout)),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// Fails with `Timeout` if the deadline has passed.
    pub fn check(&self, operation: &str, collection: &str) -> DocIndexResult<()> {
        if self.is_expired() {
            log::error!("Deadline expired before {} on `{}`", operation, collection);
            return Err(DocIndexError::new(
                &format!(
                    "collection `{}`, deadline expired before {}",
                    collection, operation
                ),
                ErrorKind::Timeout,
            ));
        }
        Ok(())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Deadline::none()
    }
}
