#![deny(missing_docs)]

//! # OpenAPI Input
//!
//! - **shims**: serde deserialization layer for the subset of OpenAPI 3.x the generator reads.
//! - **index**: read-only schema, attribute and tag lookups.
//! - **lowering**: shim objects to flat codegen records.

pub mod index;
pub mod lowering;
pub mod shims;

pub use index::SchemaIndex;
pub use lowering::Lowering;
pub use shims::ApiDocument;
