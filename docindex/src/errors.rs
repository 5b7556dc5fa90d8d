use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for index reconciliation.
///
/// Each kind describes one category of failure. The reconciler decides which
/// of them are fatal for a run and which are only recorded in the outcome.
///
/// # Examples
///
/// ```rust
/// use docindex::errors::{DocIndexError, DocIndexResult, ErrorKind};
///
/// fn example() -> DocIndexResult<()> {
///     Err(DocIndexError::new("field 'email', unsupported key:foo", ErrorKind::DirectiveParseError))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::DirectiveParseError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A per-field index directive is malformed or uses an unsupported key
    DirectiveParseError,
    /// The record schema violates the identifier-field convention
    SchemaConventionError,
    /// A collection or index must be created but auto-update is disabled
    PendingCreation,
    /// An index must be dropped but auto-update is disabled
    PendingDrop,
    /// Local and remote indexes over the same fields disagree on uniqueness
    UniqueMismatch,
    /// Creating or dropping an index failed while auto-update is enabled
    ApplyError,
    /// The store failed to answer an existence check or a catalog listing
    StoreIOError,
    /// A catalog entry could not be decoded into an index description
    EncodingError,
    /// The configured deadline elapsed before an external call could be made
    Timeout,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DirectiveParseError => write!(f, "Directive parse error"),
            ErrorKind::SchemaConventionError => write!(f, "Schema convention error"),
            ErrorKind::PendingCreation => write!(f, "Pending creation"),
            ErrorKind::PendingDrop => write!(f, "Pending drop"),
            ErrorKind::UniqueMismatch => write!(f, "Unique mismatch"),
            ErrorKind::ApplyError => write!(f, "Apply error"),
            ErrorKind::StoreIOError => write!(f, "Store IO error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type for every fallible docindex operation.
///
/// `DocIndexError` carries a message, an [`ErrorKind`], an optional cause and
/// the backtrace captured where it was created.
///
/// # Examples
///
/// ```rust
/// use docindex::errors::{DocIndexError, ErrorKind};
///
/// let cause = DocIndexError::new("connection reset", ErrorKind::StoreIOError);
/// let err = DocIndexError::new_with_cause("failed to list indexes of `user`", ErrorKind::StoreIOError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct DocIndexError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocIndexError>>,
    backtrace: Arc<Backtrace>,
}

impl DocIndexError {
    /// Creates a new `DocIndexError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocIndexError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `DocIndexError` wrapping a cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocIndexError) -> Self {
        DocIndexError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&DocIndexError> {
        self.cause.as_deref()
    }

    /// Returns true for the kinds that abort a reconciliation run and must
    /// stop the owning model's initialization.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.error_kind,
            ErrorKind::PendingCreation | ErrorKind::PendingDrop | ErrorKind::UniqueMismatch
        )
    }
}

impl Display for DocIndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocIndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // message with backtrace, or message followed by the cause chain
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for DocIndexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, DocIndexError>`.
pub type DocIndexResult<T> = Result<T, DocIndexError>;

impl From<std::str::Utf8Error> for DocIndexError {
    fn from(err: std::str::Utf8Error) -> Self {
        DocIndexError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::DirectiveParseError,
        )
    }
}
