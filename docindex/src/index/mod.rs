//! Local and remote index descriptions.
//!
//! This module turns per-field index directives into index models, reads the
//! indexes that exist on a live collection, and reduces both sides to a
//! [`CanonicalKey`] so they can be compared.
//!
//! # Directives
//!
//! ```rust
//! use docindex::index::{CanonicalIndex, LocalIndexBuilder};
//!
//! let models = LocalIndexBuilder::new()
//!     .add_raw("email", "unique")?
//!     .add_raw("created", "single=-1")?
//!     .build();
//!
//! let keys: Vec<String> = models.iter().map(|m| m.canonical_key().to_string()).collect();
//! assert_eq!(keys, vec!["email_", "created_"]);
//! # Ok::<(), docindex::errors::DocIndexError>(())
//! ```
//!
//! # Components
//!
//! - [`IndexDirective`]: parsed form of one field's directive string
//! - [`LocalIndexBuilder`]: groups directives into single and compound [`IndexModel`]s
//! - [`CanonicalKey`]: order-insensitive identity of an index's field set
//! - [`RemoteIndexLister`]: decodes a collection's index catalog into [`RemoteIndex`]es

mod builder;
mod canonical;
mod directive;
mod model;
mod remote;

pub use builder::*;
pub use canonical::*;
pub use directive::*;
pub use model::*;
pub use remote::*;
