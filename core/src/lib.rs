#![deny(missing_docs)]

//! # gosrv Core
//!
//! Package resolution and validation-condition engine for Go server code
//! generation (gin, go-zero, go-zero `.api`).
//!
//! Reads an OpenAPI document and produces an enriched tree of package-aware
//! records: which package every type and tag lives in, which alias importers
//! use, what each file imports, and which validation directives each field carries.

/// Shared error types.
pub mod error;

/// Identifier and path helpers.
pub mod naming;

/// Output tree shapes.
pub mod layout;

/// Type mapping, import mapping and primitives.
pub mod overrides;

/// Generator options.
pub mod config;

/// Codegen records.
pub mod model;

/// Validation condition derivation.
pub mod conditions;

/// OpenAPI input: shims, lookups and lowering.
pub mod oas;

/// Package path and alias resolution.
pub mod resolver;

/// Model and operation enrichment.
pub mod enrich;

pub use conditions::{derive_conditions, ConditionFlags, ConditionName, ConditionRecord};
pub use config::GeneratorConfig;
pub use enrich::enrich_document;
pub use error::{AppError, AppResult};
pub use layout::OutputLayout;
pub use model::{EnrichedTree, ModelUnit, OperationGroup, OperationUnit};
pub use oas::ApiDocument;
pub use resolver::{to_relative, PackageResolver};
