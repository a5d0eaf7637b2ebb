#![deny(missing_docs)]

//! # Type Override Table
//!
//! Static data describing how schema type keys map onto Go types and which Go
//! types come from library packages instead of generated ones.
//!
//! The table is plain data handed to the resolvers through configuration, so
//! new runtime quirks are added as entries rather than as branches.

use std::collections::{BTreeMap, BTreeSet};

/// Where a Go type lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTarget<'a> {
    /// A type produced by this generator; its package path is computed.
    Generated,
    /// A type from a fixed library package.
    External(&'a str),
    /// Built into the language. No import.
    Builtin,
}

/// Type mapping, import mapping and primitive set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOverrides {
    /// Schema type key (`DateTime`, `File`, `integer`, ...) -> Go type.
    pub type_mapping: BTreeMap<String, String>,
    /// Go type -> library import path.
    pub import_mapping: BTreeMap<String, String>,
    /// Go types that never need an import.
    pub primitives: BTreeSet<String>,
}

const GO_TYPE_MAPPING: &[(&str, &str)] = &[
    ("integer", "int32"),
    ("long", "int64"),
    ("number", "float32"),
    ("float", "float32"),
    ("double", "float64"),
    ("decimal", "float64"),
    ("boolean", "bool"),
    ("string", "string"),
    ("UUID", "string"),
    ("URI", "string"),
    ("date", "string"),
    ("DateTime", "time.Time"),
    ("password", "string"),
    ("ByteArray", "string"),
    ("binary", "*os.File"),
    ("File", "*multipart.FileHeader"),
    ("file", "*multipart.FileHeader"),
    ("null", "nil"),
    ("object", "map[string]interface{}"),
    ("AnyType", "interface{}"),
];

const GO_IMPORT_MAPPING: &[(&str, &str)] = &[
    ("*multipart.FileHeader", "mime/multipart"),
    ("*os.File", "os"),
    ("time.Time", "time"),
];

const GO_PRIMITIVES: &[&str] = &[
    "string",
    "bool",
    "uint",
    "uint32",
    "uint64",
    "int",
    "int32",
    "int64",
    "float32",
    "float64",
    "complex64",
    "complex128",
    "rune",
    "byte",
    "map[string]interface{}",
    "interface{}",
    "nil",
];

/// Library packages whose default identifier is never ambiguous.
pub const DEFAULT_NO_ALIAS_PACKAGES: &[&str] = &["mime/multipart", "os", "time"];

impl Default for TypeOverrides {
    fn default() -> Self {
        Self {
            type_mapping: to_map(GO_TYPE_MAPPING),
            import_mapping: to_map(GO_IMPORT_MAPPING),
            primitives: GO_PRIMITIVES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl TypeOverrides {
    /// Overlays user supplied mappings on top of the current table.
    pub fn with_mappings(
        mut self,
        type_mapping: &BTreeMap<String, String>,
        import_mapping: &BTreeMap<String, String>,
    ) -> Self {
        self.type_mapping
            .extend(type_mapping.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.import_mapping
            .extend(import_mapping.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Go type for a schema type key, if mapped.
    pub fn go_type(&self, key: &str) -> Option<&str> {
        self.type_mapping.get(key).map(String::as_str)
    }

    /// Generated class name for a schema name. Mapped names are redirected.
    pub fn model_class_name(&self, schema_name: &str) -> String {
        self.go_type(schema_name)
            .map(str::to_string)
            .unwrap_or_else(|| schema_name.to_string())
    }

    /// True when a class name is the target of a type mapping, i.e. it is never
    /// generated as a standalone model.
    pub fn is_mapped_target(&self, class_name: &str) -> bool {
        self.type_mapping.values().any(|v| v == class_name)
    }

    /// Classifies a Go type. Pointer and slice prefixes are ignored for primitives.
    pub fn target(&self, go_type: &str) -> TypeTarget<'_> {
        if let Some(path) = self.import_mapping.get(go_type) {
            return TypeTarget::External(path);
        }
        let bare = go_type.trim_start_matches(['*', '[', ']']);
        if self.primitives.contains(go_type) || self.primitives.contains(bare) {
            TypeTarget::Builtin
        } else {
            TypeTarget::Generated
        }
    }

    /// True when the Go type needs no generated import of its own.
    pub fn is_primitive(&self, go_type: &str) -> bool {
        !matches!(self.target(go_type), TypeTarget::Generated)
    }
}
