//! Record schema descriptors.
//!
//! The reconciler does not inspect record types. It consumes a
//! [`SchemaDescriptor`]: the collection name, the identifier field and the
//! ordered list of stored fields with their raw index directives.

mod descriptor;

pub use descriptor::*;
