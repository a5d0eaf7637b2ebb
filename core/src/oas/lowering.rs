#![deny(missing_docs)]

//! # Lowering
//!
//! Copies shim objects field-by-field into the flat codegen records.
//!
//! - Schema type keys (`integer`, `DateTime`, `File`, ...) are mapped to Go types
//!   through the override table.
//! - Scalar component schemas (`type: string` aliases) are inlined where referenced.
//! - Form bodies become one `form` parameter per property; any other body
//!   becomes a single `body` parameter.
//! - The return type comes from the first 2xx response carrying content.

use crate::error::{AppError, AppResult};
use crate::model::{
    Bound, Constraints, Container, Field, FieldFormat, Model, Operation, ParamLocation, Parameter,
    ReturnType,
};
use crate::naming::{derive_operation_id, to_camel_identifier};
use crate::oas::index::{component_ref_name, schema_ref_name, SchemaIndex};
use crate::oas::shims::{
    ShimAdditionalProperties, ShimOperation, ShimParameter, ShimRequestBody, ShimResponse,
    ShimSchema,
};
use crate::overrides::TypeOverrides;
use serde_json::{Number, Value};
use utoipa::openapi::RefOr;

const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";
const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";
const RESPONSE_REF_PREFIX: &str = "#/components/responses/";

/// Tag given to operations that declare none.
pub const DEFAULT_TAG: &str = "default";

/// Go type shape of a schema.
#[derive(Debug, Clone, PartialEq)]
struct TypeShape {
    data_type: String,
    base_type: String,
    container: Container,
    referenced_type: Option<String>,
    is_file: bool,
}

impl TypeShape {
    fn scalar(go_type: String, is_file: bool) -> Self {
        Self {
            base_type: go_type.clone(),
            data_type: go_type,
            container: Container::Scalar,
            referenced_type: None,
            is_file,
        }
    }

    fn wrap(inner: TypeShape, container: Container) -> Self {
        let prefix = match container {
            Container::Array => "[]",
            Container::Map => "map[string]",
            Container::Scalar => "",
        };
        Self {
            data_type: format!("{}{}", prefix, inner.data_type),
            container,
            ..inner
        }
    }
}

/// Lowers one document into models and operations.
pub struct Lowering<'a> {
    index: &'a SchemaIndex<'a>,
    overrides: &'a TypeOverrides,
}

impl<'a> Lowering<'a> {
    /// Creates a lowering pass over an indexed document.
    pub fn new(index: &'a SchemaIndex<'a>, overrides: &'a TypeOverrides) -> Self {
        Self { index, overrides }
    }

    /// Every component schema that becomes a Go type, in declaration order.
    /// Scalar aliases are inlined at their references and get no model.
    pub fn models(&self) -> AppResult<Vec<Model>> {
        let schemas = &self.index.document().components.schemas;
        let mut models = Vec::with_capacity(schemas.len());

        for (name, schema) in schemas {
            if schema.is_scalar_alias() {
                tracing::debug!(schema = %name, "inlining scalar alias");
                continue;
            }
            let mut fields = Vec::with_capacity(schema.properties.len());
            for (prop, prop_schema) in &schema.properties {
                let context = format!("schema '{}' property '{}'", name, prop);
                let required = schema.required.iter().any(|r| r == prop);
                fields.push(self.lower_field(prop, prop_schema, required, &context)?);
            }

            let mut one_of = Vec::new();
            for member in &schema.one_of {
                if let RefOr::Ref(r) = member {
                    let context = format!("oneOf of schema '{}'", name);
                    let (member_name, _) = self.resolve_schema_ref(&r.ref_location, &context)?;
                    one_of.push(member_name);
                }
            }

            models.push(Model {
                name: name.clone(),
                class_name: self.overrides.model_class_name(name),
                description: schema.description.clone(),
                fields,
                one_of,
                enum_values: schema.enum_values.clone().unwrap_or_default(),
            });
        }
        Ok(models)
    }

    /// Every operation: paths in declaration order, methods in fixed order.
    pub fn operations(&self) -> AppResult<Vec<Operation>> {
        let doc = self.index.document();
        let mut operations = Vec::new();

        for (path, item) in &doc.paths {
            for (method, op) in item.operations() {
                let operation_id = op
                    .operation_id
                    .clone()
                    .unwrap_or_else(|| derive_operation_id(method, path));
                let context = format!("operation '{}'", operation_id);

                let mut params = self.lower_parameters(&item.parameters, op, &context)?;
                if let Some(body) = &op.request_body {
                    params.extend(self.lower_request_body(body, &context)?);
                }

                operations.push(Operation {
                    operation_id,
                    method: method.to_string(),
                    path: path.clone(),
                    tag: op
                        .tags
                        .first()
                        .cloned()
                        .unwrap_or_else(|| DEFAULT_TAG.to_string()),
                    summary: op.summary.clone(),
                    params,
                    return_type: self.lower_return_type(op, &context)?,
                    paginated: is_paginated(op),
                    deprecated: op.deprecated,
                });
            }
        }
        Ok(operations)
    }

    /// Lowers one property or parameter schema into a field.
    pub fn lower_field(
        &self,
        name: &str,
        schema: &RefOr<ShimSchema>,
        required: bool,
        context: &str,
    ) -> AppResult<Field> {
        let shape = self.lower_type(schema, context)?;
        let facts = self.effective_schema(schema);

        let raw_format = facts.and_then(|s| s.format.clone());
        Ok(Field {
            name: name.to_string(),
            data_type: shape.data_type,
            base_type: shape.base_type,
            container: shape.container,
            format: raw_format
                .as_deref()
                .map(FieldFormat::parse)
                .unwrap_or_default(),
            raw_format,
            constraints: facts.map(constraints).unwrap_or_default(),
            is_enum: facts.is_some_and(|s| s.enum_values.is_some()),
            required,
            read_only: facts.is_some_and(|s| s.read_only),
            is_file: shape.is_file,
            referenced_type: shape.referenced_type,
            description: facts.and_then(|s| s.description.clone()),
        })
    }

    /// Schema whose format and constraints describe a field: the inline
    /// schema, or the target of a reference to a scalar alias.
    fn effective_schema<'s>(&self, schema: &'s RefOr<ShimSchema>) -> Option<&'s ShimSchema>
    where
        'a: 's,
    {
        match schema {
            RefOr::T(s) => Some(s),
            RefOr::Ref(r) => schema_ref_name(&r.ref_location)
                .and_then(|name| self.index.get(&name))
                .filter(|target| target.is_scalar_alias()),
        }
    }

    fn resolve_schema_ref(
        &self,
        ref_location: &str,
        context: &str,
    ) -> AppResult<(String, &'a ShimSchema)> {
        let name = schema_ref_name(ref_location).ok_or_else(|| {
            AppError::General(format!(
                "Unsupported reference '{}' in {}",
                ref_location, context
            ))
        })?;
        match self.index.get(&name) {
            Some(schema) => Ok((name, schema)),
            None => Err(AppError::Resolution {
                type_name: name,
                context: context.to_string(),
            }),
        }
    }

    fn lower_type(&self, schema: &RefOr<ShimSchema>, context: &str) -> AppResult<TypeShape> {
        match schema {
            RefOr::Ref(r) => {
                let (name, target) = self.resolve_schema_ref(&r.ref_location, context)?;
                if target.is_scalar_alias() {
                    return self.lower_inline(target, context);
                }
                let class_name = self.overrides.model_class_name(&name);
                if self.overrides.is_primitive(&class_name) {
                    let is_file = self.is_file_type(&class_name);
                    Ok(TypeShape::scalar(class_name, is_file))
                } else {
                    Ok(TypeShape {
                        data_type: class_name.clone(),
                        base_type: class_name,
                        container: Container::Scalar,
                        referenced_type: Some(name),
                        is_file: false,
                    })
                }
            }
            RefOr::T(s) => self.lower_inline(s, context),
        }
    }

    fn lower_inline(&self, schema: &ShimSchema, context: &str) -> AppResult<TypeShape> {
        let primary = schema.primary_type();

        if primary == Some("array") || (primary.is_none() && schema.items.is_some()) {
            let inner = match &schema.items {
                Some(items) => self.lower_type(items, context)?,
                None => self.mapped_scalar("AnyType"),
            };
            return Ok(TypeShape::wrap(inner, Container::Array));
        }

        if matches!(primary, None | Some("object")) && schema.properties.is_empty() {
            if let Some(ShimAdditionalProperties::Schema(values)) = &schema.additional_properties {
                let inner = self.lower_type(values, context)?;
                return Ok(TypeShape::wrap(inner, Container::Map));
            }
        }

        Ok(self.mapped_scalar(type_key(schema)))
    }

    fn mapped_scalar(&self, key: &str) -> TypeShape {
        let go_type = self.overrides.go_type(key).unwrap_or(key).to_string();
        let is_file = self.is_file_type(&go_type);
        TypeShape::scalar(go_type, is_file)
    }

    fn is_file_type(&self, go_type: &str) -> bool {
        ["file", "File", "binary"]
            .iter()
            .any(|key| self.overrides.go_type(key) == Some(go_type))
    }

    fn lower_parameters(
        &self,
        shared: &[RefOr<ShimParameter>],
        op: &ShimOperation,
        context: &str,
    ) -> AppResult<Vec<Parameter>> {
        let mut merged: Vec<&ShimParameter> = Vec::new();
        for param in shared.iter().chain(&op.parameters) {
            let param = self.resolve_parameter(param, context)?;
            // Operation-level parameters override shared ones with the same name and location.
            match merged
                .iter()
                .position(|p| p.name == param.name && p.location == param.location)
            {
                Some(i) => merged[i] = param,
                None => merged.push(param),
            }
        }

        let string_schema = RefOr::T(ShimSchema {
            schema_type: Some(Value::String("string".into())),
            ..Default::default()
        });

        merged
            .into_iter()
            .map(|param| {
                let location = ParamLocation::parse(&param.location).ok_or_else(|| {
                    AppError::General(format!(
                        "Unsupported parameter location '{}' for '{}' in {}",
                        param.location, param.name, context
                    ))
                })?;
                let schema = param.schema.as_ref().unwrap_or(&string_schema);
                let required = param.required || location == ParamLocation::Path;
                let mut field = self.lower_field(&param.name, schema, required, context)?;
                if field.description.is_none() {
                    field.description = param.description.clone();
                }
                Ok(Parameter {
                    location,
                    param_name: to_camel_identifier(&param.name),
                    field,
                })
            })
            .collect()
    }

    fn resolve_parameter<'p>(
        &self,
        param: &'p RefOr<ShimParameter>,
        context: &str,
    ) -> AppResult<&'p ShimParameter>
    where
        'a: 'p,
    {
        match param {
            RefOr::T(p) => Ok(p),
            RefOr::Ref(r) => {
                let name = component_ref_name(&r.ref_location, PARAMETER_REF_PREFIX);
                name.as_ref()
                    .and_then(|n| self.index.document().components.parameters.get(n))
                    .ok_or_else(|| AppError::Resolution {
                        type_name: name.unwrap_or_else(|| r.ref_location.clone()),
                        context: context.to_string(),
                    })
            }
        }
    }

    fn lower_request_body(
        &self,
        body: &RefOr<ShimRequestBody>,
        context: &str,
    ) -> AppResult<Vec<Parameter>> {
        let body = match body {
            RefOr::T(b) => b,
            RefOr::Ref(r) => {
                let name = component_ref_name(&r.ref_location, REQUEST_BODY_REF_PREFIX);
                name.as_ref()
                    .and_then(|n| self.index.document().components.request_bodies.get(n))
                    .ok_or_else(|| AppError::Resolution {
                        type_name: name.unwrap_or_else(|| r.ref_location.clone()),
                        context: context.to_string(),
                    })?
            }
        };

        let Some((media_type, schema)) = body
            .content
            .iter()
            .find_map(|(mt, media)| media.schema.as_ref().map(|s| (mt.as_str(), s)))
        else {
            return Ok(Vec::new());
        };

        if is_form_media_type(media_type) {
            return self.lower_form(schema, context);
        }

        let field_name = match body.extensions.get("x-codegen-request-body-name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => match schema {
                RefOr::Ref(r) => schema_ref_name(&r.ref_location)
                    .map(|name| self.overrides.model_class_name(&name))
                    .unwrap_or_else(|| "body".to_string()),
                RefOr::T(_) => "body".to_string(),
            },
        };
        let mut field = self.lower_field(&field_name, schema, body.required, context)?;
        if field.description.is_none() {
            field.description = body.description.clone();
        }
        Ok(vec![Parameter {
            location: ParamLocation::Body,
            param_name: to_camel_identifier(&field_name),
            field,
        }])
    }

    fn lower_form(&self, schema: &RefOr<ShimSchema>, context: &str) -> AppResult<Vec<Parameter>> {
        let object = match schema {
            RefOr::T(s) => s,
            RefOr::Ref(r) => self.resolve_schema_ref(&r.ref_location, context)?.1,
        };
        object
            .properties
            .iter()
            .map(|(name, prop)| {
                let required = object.required.iter().any(|r| r == name);
                Ok(Parameter {
                    location: ParamLocation::Form,
                    param_name: to_camel_identifier(name),
                    field: self.lower_field(name, prop, required, context)?,
                })
            })
            .collect()
    }

    fn lower_return_type(&self, op: &ShimOperation, context: &str) -> AppResult<Option<ReturnType>> {
        for (status, response) in &op.responses {
            if !status.starts_with('2') {
                continue;
            }
            let Some(response) = self.resolve_response(response) else {
                continue;
            };
            let Some(schema) = response.content.values().find_map(|m| m.schema.as_ref()) else {
                continue;
            };
            let shape = self.lower_type(schema, context)?;
            return Ok(Some(ReturnType {
                data_type: shape.data_type,
                base_type: shape.base_type,
                container: shape.container,
                referenced_type: shape.referenced_type,
            }));
        }
        Ok(None)
    }

    fn resolve_response<'r>(&self, response: &'r RefOr<ShimResponse>) -> Option<&'r ShimResponse>
    where
        'a: 'r,
    {
        match response {
            RefOr::T(r) => Some(r),
            RefOr::Ref(r) => component_ref_name(&r.ref_location, RESPONSE_REF_PREFIX)
                .and_then(|name| self.index.document().components.responses.get(&name)),
        }
    }
}

/// Schema type key looked up in the override table.
fn type_key(schema: &ShimSchema) -> &'static str {
    let format = schema.format.as_deref().map(str::to_ascii_lowercase);
    match schema.primary_type() {
        Some("string") => match format.as_deref() {
            Some("date-time") => "DateTime",
            Some("date") => "date",
            Some("binary") => "file",
            Some("byte") => "ByteArray",
            Some("uuid") => "UUID",
            Some("uri") => "URI",
            Some("password") => "password",
            _ => "string",
        },
        Some("integer") => match format.as_deref() {
            Some("int64") => "long",
            _ => "integer",
        },
        Some("number") => match format.as_deref() {
            Some("float") => "float",
            Some("double") => "double",
            _ => "number",
        },
        Some("boolean") => "boolean",
        Some("file") => "file",
        Some("object") => "object",
        Some("null") => "null",
        Some(_) => "AnyType",
        None if !schema.properties.is_empty() => "object",
        None => "AnyType",
    }
}

fn is_form_media_type(media_type: &str) -> bool {
    media_type.starts_with("multipart/") || media_type == "application/x-www-form-urlencoded"
}

/// `x-paginated` is present and not explicitly `false`.
fn is_paginated(op: &ShimOperation) -> bool {
    !matches!(
        op.extensions.get("x-paginated"),
        None | Some(Value::Null) | Some(Value::Bool(false))
    )
}

fn constraints(schema: &ShimSchema) -> Constraints {
    Constraints {
        min: None,
        max: None,
        min_properties: as_u64(&schema.min_properties),
        max_properties: as_u64(&schema.max_properties),
        max_length: as_u64(&schema.max_length),
        min_length: as_u64(&schema.min_length),
        pattern: schema
            .pattern
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string),
        minimum: bound(&schema.minimum, &schema.exclusive_minimum),
        maximum: bound(&schema.maximum, &schema.exclusive_maximum),
        multiple_of: as_number(&schema.multiple_of),
        max_items: as_u64(&schema.max_items),
        min_items: as_u64(&schema.min_items),
        unique_items: matches!(schema.unique_items, Some(Value::Bool(true))),
    }
}

/// A 3.1 numeric `exclusiveMinimum` is itself the bound; a 3.0 boolean flags `minimum`.
fn bound(value: &Option<Value>, exclusive: &Option<Value>) -> Option<Bound> {
    if let Some(Value::Number(n)) = exclusive {
        return Some(Bound {
            value: n.clone(),
            exclusive: true,
        });
    }
    Some(Bound {
        value: as_number(value)?,
        exclusive: matches!(exclusive, Some(Value::Bool(true))),
    })
}

fn as_number(value: &Option<Value>) -> Option<Number> {
    match value {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

fn as_u64(value: &Option<Value>) -> Option<u64> {
    value.as_ref().and_then(Value::as_u64)
}
