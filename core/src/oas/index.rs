#![deny(missing_docs)]

//! # Schema Index
//!
//! Read-only lookups over a parsed document: type names to schemas, vendor
//! attributes, declared tags, and `$ref` targets.
//!
//! Type-name lookup is case-insensitive and the first schema in declaration
//! order wins. When several schemas collide this way the collision is recorded
//! as a diagnostic rather than rejected.

use crate::model::{Diagnostic, DiagnosticKind};
use crate::oas::shims::{ApiDocument, ShimSchema, ShimTag};
use indexmap::IndexMap;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Lookup view over one document.
pub struct SchemaIndex<'a> {
    doc: &'a ApiDocument,
    ambiguities: Vec<Diagnostic>,
}

impl<'a> SchemaIndex<'a> {
    /// Indexes a document and records case-insensitive name collisions.
    pub fn new(doc: &'a ApiDocument) -> Self {
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        for name in doc.components.schemas.keys() {
            groups
                .entry(name.to_lowercase())
                .or_default()
                .push(name.clone());
        }

        let ambiguities = groups
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(key, names)| {
                let chosen = names.first().cloned().unwrap_or_default();
                tracing::warn!(
                    type_name = %key,
                    chosen = %chosen,
                    candidates = ?names,
                    "schema name matches several schemas case-insensitively; first declared wins"
                );
                Diagnostic {
                    kind: DiagnosticKind::AmbiguousTypeName,
                    subject: key,
                    candidates: names,
                }
            })
            .collect();

        Self { doc, ambiguities }
    }

    /// The indexed document.
    pub fn document(&self) -> &'a ApiDocument {
        self.doc
    }

    /// Case-insensitive lookup; the first declared match wins.
    pub fn lookup(&self, type_name: &str) -> Option<(&'a str, &'a ShimSchema)> {
        let wanted = type_name.to_lowercase();
        self.doc
            .components
            .schemas
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(name, schema)| (name.as_str(), schema))
    }

    /// Exact lookup, as used for `$ref` targets.
    pub fn get(&self, type_name: &str) -> Option<&'a ShimSchema> {
        self.doc.components.schemas.get(type_name)
    }

    /// Reads a vendor attribute of the schema a type name resolves to.
    pub fn attribute(&self, type_name: &str, attribute: &str) -> Option<String> {
        if attribute.is_empty() {
            return None;
        }
        self.lookup(type_name)
            .and_then(|(_, schema)| schema.extension_str(attribute))
    }

    /// Declared tag matching a name exactly, or case-insensitively as a fallback.
    pub fn find_tag(&self, name: &str) -> Option<&'a ShimTag> {
        let tags = &self.doc.tags;
        tags.iter()
            .find(|t| t.name == name)
            .or_else(|| tags.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
    }

    /// Case-insensitive collisions found while indexing.
    pub fn ambiguities(&self) -> &[Diagnostic] {
        &self.ambiguities
    }
}

/// Extracts the schema name from `#/components/schemas/{name}`.
pub fn schema_ref_name(ref_location: &str) -> Option<String> {
    component_ref_name(ref_location, SCHEMA_REF_PREFIX)
}

/// Extracts a component name from a local reference with the given prefix.
pub fn component_ref_name(ref_location: &str, prefix: &str) -> Option<String> {
    let raw = ref_location.strip_prefix(prefix)?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(decode_pointer_segment(raw))
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
