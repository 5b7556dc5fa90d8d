//! # docindex - Index reconciliation for document stores
//!
//! Record types declare their indexes next to their fields, as short
//! directive strings such as `unique`, `single=-1` or
//! `group=uniqueName,groupseq=2`. At startup `docindex` compares these
//! declarations with the indexes a live collection actually has and either
//! fixes the difference or refuses to start.
//!
//! ## Key Features
//!
//! - **Directive parsing**: one query-string-like directive per field
//! - **Compound indexes**: fields sharing a group form one ordered compound key
//! - **Canonical comparison**: local and remote indexes match on their field set
//! - **Safety gate**: without auto-update nothing is changed and every needed
//!   change is reported; uniqueness disagreements are always fatal
//! - **Dry runs**: plans can be computed using read calls only
//! - **Pluggable stores**: four administrative calls behind one trait, with an
//!   in-memory store included
//!
//! ## Quick Start
//!
//! ```rust
//! use docindex::schema::{IdKind, SchemaDescriptor};
//! use docindex::store::InMemoryStore;
//! use docindex::IndexSync;
//!
//! let store = InMemoryStore::new();
//! let sync = IndexSync::builder()
//!     .auto_check(true)
//!     .auto_update(true)
//!     .admin(store.clone())
//!     .build()?;
//!
//! let person = SchemaDescriptor::builder("person")
//!     .id_field("_id,omitempty", IdKind::ObjectId)
//!     .field("email", Some("unique"))
//!     .field("last", Some("group=uniqueName,groupseq=1"))
//!     .field("first", Some("group=uniqueName,groupseq=2"))
//!     .build()?;
//!
//! let created = sync.init_descriptor(&person)?;
//! assert!(created);
//! assert_eq!(store.index_names("person"), vec!["_id_", "email_1", "last_1_first_1"]);
//! # Ok::<(), docindex::errors::DocIndexError>(())
//! ```
//!
//! With `#[derive(IndexedRecord)]` from `docindex_derive` the descriptor is
//! generated from the struct and `IndexSync::init_model::<Person>()` does the
//! same.
//!
//! ## Module Organization
//!
//! - [`common`] - Constants and index direction
//! - [`config`] - Reconciliation policy and deadlines
//! - [`errors`] - Error types and result definitions
//! - [`index`] - Directives, index models, canonical keys, remote catalog decoding
//! - [`reconcile`] - Plans and the reconciler
//! - [`schema`] - Record schema descriptors
//! - [`store`] - Collection administration boundary and the in-memory store

pub mod common;
pub mod config;
pub mod errors;
pub mod index;
mod index_sync;
mod index_sync_builder;
pub mod reconcile;
pub mod schema;
pub mod store;

pub use index_sync::*;
pub use index_sync_builder::*;
