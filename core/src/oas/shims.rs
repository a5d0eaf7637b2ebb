#![deny(missing_docs)]

//! # Document Shims
//!
//! Intermediate Deserialization Layer for the subset of OpenAPI 3.x the
//! generator reads. Maps preserve declaration order (`IndexMap`), because
//! first-declared wins when names collide case-insensitively.
//!
//! Constraint values are kept as raw JSON so a malformed value (e.g. a
//! non-numeric `minimum`) is dropped during lowering instead of failing the parse.
//!
//! Note: shims holding `RefOr` do not derive `Debug`.

use crate::error::AppResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::openapi::RefOr;

/// Root document.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ApiDocument {
    /// OpenAPI version.
    pub openapi: Option<String>,
    /// Declared tags.
    #[serde(default)]
    pub tags: Vec<ShimTag>,
    /// Path items keyed by template.
    #[serde(default)]
    pub paths: IndexMap<String, ShimPathItem>,
    /// Reusable components.
    #[serde(default)]
    pub components: ShimComponents,
}

impl ApiDocument {
    /// Parses a YAML (or JSON) document.
    pub fn from_yaml(yaml: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Tag declaration.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
pub struct ShimTag {
    /// Tag name, possibly `/`-nested (`admin/users`).
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

/// Components object.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ShimComponents {
    /// Schemas in declaration order.
    #[serde(default)]
    pub schemas: IndexMap<String, ShimSchema>,
    /// Reusable parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, ShimParameter>,
    /// Reusable request bodies.
    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, ShimRequestBody>,
    /// Reusable responses.
    #[serde(default)]
    pub responses: IndexMap<String, ShimResponse>,
}

/// `additionalProperties`: a flag or a value schema.
#[derive(Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum ShimAdditionalProperties {
    /// `true` / `false`
    Flag(bool),
    /// Value schema of a map.
    Schema(Box<RefOr<ShimSchema>>),
}

/// Schema object.
#[derive(Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShimSchema {
    /// `type`: a string, or a list of strings (3.1).
    #[serde(rename = "type")]
    pub schema_type: Option<Value>,
    /// `format`
    pub format: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Array items.
    pub items: Option<Box<RefOr<ShimSchema>>>,
    /// Object properties.
    #[serde(default)]
    pub properties: IndexMap<String, RefOr<ShimSchema>>,
    /// Required property names.
    #[serde(default)]
    pub required: Vec<String>,
    /// Map values.
    pub additional_properties: Option<ShimAdditionalProperties>,
    /// Enum members.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    /// `oneOf` members.
    #[serde(default)]
    pub one_of: Vec<RefOr<ShimSchema>>,
    /// Output-only.
    #[serde(default)]
    pub read_only: bool,
    /// `minLength`
    pub min_length: Option<Value>,
    /// `maxLength`
    pub max_length: Option<Value>,
    /// `pattern`
    pub pattern: Option<Value>,
    /// `minimum`
    pub minimum: Option<Value>,
    /// `maximum`
    pub maximum: Option<Value>,
    /// `exclusiveMinimum`: flag (3.0) or bound (3.1).
    pub exclusive_minimum: Option<Value>,
    /// `exclusiveMaximum`: flag (3.0) or bound (3.1).
    pub exclusive_maximum: Option<Value>,
    /// `multipleOf`
    pub multiple_of: Option<Value>,
    /// `minItems`
    pub min_items: Option<Value>,
    /// `maxItems`
    pub max_items: Option<Value>,
    /// `uniqueItems`
    pub unique_items: Option<Value>,
    /// `minProperties`
    pub min_properties: Option<Value>,
    /// `maxProperties`
    pub max_properties: Option<Value>,
    /// Everything else, vendor extensions included.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl ShimSchema {
    /// Declared type names, `null` excluded.
    pub fn types(&self) -> Vec<&str> {
        match &self.schema_type {
            Some(Value::String(t)) => vec![t.as_str()],
            Some(Value::Array(list)) => list
                .iter()
                .filter_map(Value::as_str)
                .filter(|t| *t != "null")
                .collect(),
            _ => Vec::new(),
        }
    }

    /// First declared non-null type.
    pub fn primary_type(&self) -> Option<&str> {
        self.types().into_iter().next()
    }

    /// Reads a vendor attribute as text. Non-string scalars are rendered.
    pub fn extension_str(&self, key: &str) -> Option<String> {
        match self.extensions.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// True for plain scalars that alias a primitive (`type: string` without enum).
    pub fn is_scalar_alias(&self) -> bool {
        self.enum_values.is_none()
            && self.properties.is_empty()
            && self.one_of.is_empty()
            && matches!(
                self.primary_type(),
                Some("string" | "integer" | "number" | "boolean")
            )
    }
}

/// Path item.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ShimPathItem {
    /// Parameters shared by every operation of the path.
    #[serde(default)]
    pub parameters: Vec<RefOr<ShimParameter>>,
    /// GET
    pub get: Option<ShimOperation>,
    /// PUT
    pub put: Option<ShimOperation>,
    /// POST
    pub post: Option<ShimOperation>,
    /// DELETE
    pub delete: Option<ShimOperation>,
    /// OPTIONS
    pub options: Option<ShimOperation>,
    /// HEAD
    pub head: Option<ShimOperation>,
    /// PATCH
    pub patch: Option<ShimOperation>,
}

impl ShimPathItem {
    /// Operations with their upper-case method, in a fixed method order.
    pub fn operations(&self) -> Vec<(&'static str, &ShimOperation)> {
        [
            ("GET", &self.get),
            ("PUT", &self.put),
            ("POST", &self.post),
            ("DELETE", &self.delete),
            ("OPTIONS", &self.options),
            ("HEAD", &self.head),
            ("PATCH", &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

/// Operation object.
#[derive(Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShimOperation {
    /// `operationId`
    pub operation_id: Option<String>,
    /// Tags; the first one groups the operation.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Summary.
    pub summary: Option<String>,
    /// Operation parameters.
    #[serde(default)]
    pub parameters: Vec<RefOr<ShimParameter>>,
    /// Request body.
    pub request_body: Option<RefOr<ShimRequestBody>>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
    /// Deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Vendor extensions (`x-paginated`, ...).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// Parameter object.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ShimParameter {
    /// Wire name.
    pub name: String,
    /// `in`
    #[serde(rename = "in")]
    pub location: String,
    /// Required.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Option<RefOr<ShimSchema>>,
    /// Description.
    pub description: Option<String>,
}

/// Request body object.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ShimRequestBody {
    /// Media types in declaration order.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
    /// Required.
    #[serde(default)]
    pub required: bool,
    /// Description.
    pub description: Option<String>,
    /// Vendor extensions (`x-codegen-request-body-name`, ...).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// Media type object.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ShimMediaType {
    /// Payload schema.
    pub schema: Option<RefOr<ShimSchema>>,
}

/// Response object.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ShimResponse {
    /// Description.
    pub description: Option<String>,
    /// Media types in declaration order.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_schema_with_extensions_in_order() {
        let yaml = r#"
openapi: 3.0.3
components:
  schemas:
    Zebra:
      type: object
      x-apifox-folder: dto/animals
    Apple:
      type: object
      properties:
        id:
          type: integer
          minimum: not-a-number
"#;
        let doc = ApiDocument::from_yaml(yaml).unwrap();
        let names: Vec<&String> = doc.components.schemas.keys().collect();
        assert_eq!(names, vec!["Zebra", "Apple"]);

        let zebra = &doc.components.schemas["Zebra"];
        assert_eq!(
            zebra.extension_str("x-apifox-folder").as_deref(),
            Some("dto/animals")
        );
        assert_eq!(zebra.primary_type(), Some("object"));
    }

    #[test]
    fn test_type_list_skips_null() {
        let schema: ShimSchema = serde_yaml::from_str("type: [\"null\", string]").unwrap();
        assert_eq!(schema.types(), vec!["string"]);
        assert!(schema.is_scalar_alias());
    }

    #[test]
    fn test_operations_keep_method_order() {
        let yaml = r#"
post: { operationId: create }
get: { operationId: list }
"#;
        let item: ShimPathItem = serde_yaml::from_str(yaml).unwrap();
        let methods: Vec<&str> = item.operations().into_iter().map(|(m, _)| m).collect();
        assert_eq!(methods, vec!["GET", "POST"]);
    }
}
