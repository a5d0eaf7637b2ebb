#![deny(missing_docs)]

//! # Codegen Records
//!
//! Flat Intermediate Representation (IR) records.
//!
//! Input records (`Field`, `Parameter`, `Model`, `Operation`) are produced by the
//! lowering step from the parsed document. Output records (`ModelUnit`,
//! `OperationUnit`, `OperationGroup`) are what a renderer consumes. Nothing is
//! mutated once enrichment has produced it.

use crate::conditions::ConditionRecord;
use crate::layout::OutputLayout;
use crate::naming::last_segment;
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Container shape of a field or return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// A single value.
    #[default]
    Scalar,
    /// `[]T`
    Array,
    /// `map[string]T`
    Map,
}

/// Semantic string format. One value per field, so formats can never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldFormat {
    /// No semantic format.
    #[default]
    None,
    /// `email`
    Email,
    /// `uri`
    Uri,
    /// `uuid`
    Uuid,
    /// `ipv4`
    Ipv4,
    /// `ipv6`
    Ipv6,
    /// `hostname`
    Hostname,
    /// `date`
    Date,
    /// `date-time`
    DateTime,
    /// `time`
    Time,
    /// `password`
    Password,
}

impl FieldFormat {
    /// Classifies a raw `format` string. Matching is case-insensitive.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "uri" => Self::Uri,
            "uuid" => Self::Uuid,
            "ipv4" => Self::Ipv4,
            "ipv6" => Self::Ipv6,
            "hostname" => Self::Hostname,
            "date" => Self::Date,
            "date-time" => Self::DateTime,
            "time" => Self::Time,
            "password" => Self::Password,
            _ => Self::None,
        }
    }

    /// Date, date-time or time.
    pub fn is_any_time(self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Time)
    }
}

/// A numeric range bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bound {
    /// The bound itself.
    pub value: Number,
    /// Whether the bound value is excluded.
    pub exclusive: bool,
}

/// Constraint attributes of a field. Absent constraints are `None` / `false`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Generic lower bound rendered as `min`. OpenAPI has no keyword for it,
    /// so lowering leaves it unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    /// Generic upper bound rendered as `max`. Unset by lowering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    /// Minimum property count (maps). Carried through, never a directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    /// Maximum property count (maps). Carried through, never a directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Regular expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Lower numeric bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Bound>,
    /// Upper numeric bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Bound>,
    /// Multiple-of divisor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    /// Maximum item count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Minimum item count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Items must be unique.
    pub unique_items: bool,
}

/// A property of a model or the value shape of a parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Property name as written in the schema.
    pub name: String,
    /// Go type, unqualified (`[]User`, `map[string]int32`, `time.Time`).
    pub data_type: String,
    /// Innermost Go type (`User` for `[]User`).
    pub base_type: String,
    /// Container shape.
    pub container: Container,
    /// Semantic format.
    pub format: FieldFormat,
    /// Raw `format` string, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_format: Option<String>,
    /// Constraint attributes.
    pub constraints: Constraints,
    /// Declared as an inline enum.
    pub is_enum: bool,
    /// Required by the owning schema or parameter.
    pub required: bool,
    /// Output-only.
    pub read_only: bool,
    /// File upload.
    pub is_file: bool,
    /// Schema name of the named type referenced directly or as a container item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_type: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// True when the field refers to a generated model.
    pub fn is_model(&self) -> bool {
        self.referenced_type.is_some()
    }
}

/// Classification of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// A package produced by this generator.
    Model,
    /// A fixed library package.
    Library,
}

/// One entry of an import set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRef {
    /// Import path in the layout's import style.
    pub path: String,
    /// Alias; empty means the default package identifier is used.
    pub alias: String,
    /// Model or library import.
    pub kind: ImportKind,
}

impl ImportRef {
    /// True for generated model packages.
    pub fn is_model_import(&self) -> bool {
        self.kind == ImportKind::Model
    }

    /// Identifier the importing file uses to reach the package.
    pub fn qualifier(&self) -> &str {
        if self.alias.is_empty() {
            last_segment(&self.path)
        } else {
            &self.alias
        }
    }
}

/// A field after package resolution and condition derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedField {
    /// The source field.
    #[serde(flatten)]
    pub field: Field,
    /// Go type with package qualifier where one is needed (`[]dto_user.User`).
    pub qualified_type: String,
    /// Import for the referenced type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportRef>,
    /// The referenced model lives in another package (or file) than the owner.
    pub need_import: bool,
    /// Validation conditions in emission order.
    pub conditions: Vec<ConditionRecord>,
    /// `!conditions.is_empty()`
    pub has_conditions: bool,
    /// Date, date-time or time.
    pub is_any_time: bool,
    /// Go time layout for `is_any_time` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_layout: Option<String>,
}

/// A generated model type (input).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    /// Schema name in `components/schemas`.
    pub name: String,
    /// Generated Go type name.
    pub class_name: String,
    /// Description.
    pub description: Option<String>,
    /// Properties in declaration order.
    pub fields: Vec<Field>,
    /// Schema names composed with `oneOf`.
    pub one_of: Vec<String>,
    /// Enum values when the schema itself is an enum.
    pub enum_values: Vec<Value>,
}

/// A generated model type, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUnit {
    /// Schema name.
    pub name: String,
    /// Go type name.
    pub class_name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absolute package path.
    pub package_path: String,
    /// Go `package` clause.
    pub package_name: String,
    /// Alias importers use; empty when the default identifier suffices.
    pub alias: String,
    /// This model's own identity in the layout's import style.
    pub import_path: String,
    /// Source file stem.
    pub file_stem: String,
    /// Enriched properties.
    pub fields: Vec<EnrichedField>,
    /// Deduplicated, sorted, self-import-free import set.
    pub imports: Vec<ImportRef>,
    /// Composed with `oneOf`.
    pub is_one_of: bool,
    /// `oneOf` members, qualified where they live in another package.
    pub one_ofs: Vec<String>,
    /// Enum values when the model is an enum.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
}

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// URL path segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Whole request body.
    Body,
    /// Form field of a urlencoded or multipart body.
    Form,
}

impl ParamLocation {
    /// Parses an OpenAPI `in` value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            "body" => Some(Self::Body),
            "formData" | "form" => Some(Self::Form),
            _ => None,
        }
    }
}

/// An operation parameter (input).
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Location.
    pub location: ParamLocation,
    /// Go identifier for the parameter.
    pub param_name: String,
    /// Value shape; `field.name` is the wire name.
    pub field: Field,
}

/// Declared success response type (input).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnType {
    /// Go type, unqualified.
    pub data_type: String,
    /// Innermost Go type.
    pub base_type: String,
    /// Container shape.
    pub container: Container,
    /// Schema name of the referenced model, `None` for primitives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_type: Option<String>,
}

impl ReturnType {
    /// True when no generated model is involved.
    pub fn is_primitive(&self) -> bool {
        self.referenced_type.is_none()
    }
}

/// An API operation (input).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Operation {
    /// `operationId`, or one derived from method and path.
    pub operation_id: String,
    /// Upper-case HTTP method.
    pub method: String,
    /// Path template as declared (`/users/{id}`).
    pub path: String,
    /// Grouping tag (first declared tag or `default`).
    pub tag: String,
    /// Summary.
    pub summary: Option<String>,
    /// Parameters in declaration order.
    pub params: Vec<Parameter>,
    /// Success response type.
    pub return_type: Option<ReturnType>,
    /// Carries the `x-paginated` marker.
    pub paginated: bool,
    /// Deprecated.
    pub deprecated: bool,
}

/// A parameter after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedParameter {
    /// Location.
    pub location: ParamLocation,
    /// Go identifier. `rawBody` for unwrapped bare bodies.
    pub param_name: String,
    /// Alias of the body type's package, for body parameters referencing a type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_alias: Option<String>,
    /// Enriched value shape.
    #[serde(flatten)]
    pub field: EnrichedField,
}

/// An operation, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationUnit {
    /// Operation id.
    pub operation_id: String,
    /// HTTP method.
    pub method: String,
    /// Path in `:param` syntax.
    pub path: String,
    /// Summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Deprecated.
    pub deprecated: bool,
    /// Enriched parameters.
    pub params: Vec<EnrichedParameter>,
    /// `!params.is_empty()`
    pub has_params: bool,
    /// Success response type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ReturnType>,
    /// Alias of the return type's package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_import_alias: Option<String>,
    /// Declared return type is `nil`.
    pub return_type_is_nil: bool,
    /// At least one parameter is a file upload.
    pub has_file_param: bool,
    /// Wrapped with the page package.
    pub paginated: bool,
    /// The single bare array/map body must be decoded from the raw request body.
    pub needs_raw_body: bool,
}

/// A package produced for a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRef {
    /// Absolute import path.
    pub path: String,
    /// Alias; empty when the default identifier suffices.
    pub alias: String,
    /// Go `package` clause.
    pub name: String,
}

impl PackageRef {
    /// Identifier importers use.
    pub fn qualifier(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }
}

/// All operations sharing a tag, with their generated packages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationGroup {
    /// Tag as declared on the operations.
    pub tag: String,
    /// Package sub-path derived from the tag.
    pub tag_path: String,
    /// API interface package.
    pub api: PackageRef,
    /// Handler package.
    pub handler: PackageRef,
    /// Controller package.
    pub controller: PackageRef,
    /// Operations in declaration order.
    pub operations: Vec<OperationUnit>,
    /// Deduplicated, sorted, self-import-free import set of the API interface file.
    pub imports: Vec<ImportRef>,
    /// Any operation is paginated.
    pub page_enabled: bool,
    /// Identifier of the page package.
    pub page_package_alias: String,
    /// Any operation has parameters.
    pub has_any_params: bool,
    /// Per-tag settings from configuration.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

/// Kind of non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Several schemas match one name case-insensitively; the first declared wins.
    AmbiguousTypeName,
    /// An operation tag is not declared in the document's tag list.
    UndeclaredTag,
}

/// A non-fatal finding collected during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Kind.
    pub kind: DiagnosticKind,
    /// Name the finding is about.
    pub subject: String,
    /// Candidates involved, in declaration order.
    pub candidates: Vec<String>,
}

/// The complete output of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTree {
    /// Layout the tree was shaped for.
    pub layout: OutputLayout,
    /// Module root.
    pub module_root: String,
    /// Models in declaration order, mapped types excluded.
    pub models: Vec<ModelUnit>,
    /// Operation groups ordered by tag.
    pub groups: Vec<OperationGroup>,
    /// Non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
}
