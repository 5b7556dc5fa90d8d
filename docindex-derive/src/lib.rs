#![recursion_limit = "128"]
//! # docindex Derive Macros
//!
//! This crate provides the `IndexedRecord` derive for the `docindex` crate.
//!
//! ### `IndexedRecord`
//!
//! Generates the static [`SchemaDescriptor`] of a record type: the collection
//! it is stored in, the identifier field, and every stored field with its
//! index directive.
//!
//! - **Supported for**: Structs with named fields only
//! - **Struct attribute**: `#[record(collection = "...")]`, defaults to the
//!   lower camel case of the struct name
//! - **Field attribute**: `#[record(name = "...", index = "...")]`; `name` is the
//!   storage name (defaults to the field identifier), `index` the directive
//!
//! The first field is the identifier. Its type must be `String` or a type
//! named `ObjectId`, and it must be stored as `_id`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use docindex_derive::IndexedRecord;
//!
//! #[derive(IndexedRecord)]
//! pub struct UserProfile {
//!     #[record(name = "_id,omitempty")]
//!     pub id: ObjectId,
//!     #[record(index = "unique")]
//!     pub email: String,
//!     #[record(name = "lastName", index = "group=uniqueName,groupseq=1")]
//!     pub last_name: String,
//!     #[record(name = "firstName", index = "group=uniqueName,groupseq=2")]
//!     pub first_name: String,
//! }
//!
//! // stored in the `userProfile` collection
//! let schema = UserProfile::schema()?;
//! ```
//!
//! [`SchemaDescriptor`]: ../docindex/schema/struct.SchemaDescriptor.html

extern crate proc_macro;
mod indexed_record;

use crate::indexed_record::generate_record_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives `docindex::schema::IndexedRecord` for a struct.
///
/// # Attributes
///
/// - `#[record(collection = "name")]` on the struct
/// - `#[record(name = "storage_name", index = "directive")]` on a field
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum, a union, a tuple struct or a struct without fields
/// - The first field is neither a `String` nor an `ObjectId`
/// - An attribute key is unknown
#[proc_macro_derive(IndexedRecord, attributes(record))]
pub fn derive_indexed_record(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_record_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => e.to_compile_error().into(),
        },
        Data::Enum(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive IndexedRecord for enums. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
        Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive IndexedRecord for unions. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
    }
}
