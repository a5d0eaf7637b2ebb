#![deny(missing_docs)]

//! # Operation Enrichment
//!
//! Groups operations by tag and resolves, per group, the API interface,
//! handler and controller packages plus the import set of the interface file.
//!
//! Per operation:
//! - `{id}` path parameters become `:id`.
//! - Parameters get conditions and imports like model fields do.
//! - A single bare array/map body is renamed `rawBody` and flagged for raw decoding.
//! - A referenced return type must exist in the document.

use crate::enrich::{enrich_field, EnrichContext};
use crate::error::{AppError, AppResult};
use crate::layout::ImportStyle;
use crate::model::{
    Container, Diagnostic, DiagnosticKind, EnrichedParameter, ImportRef, Operation,
    OperationGroup, OperationUnit, ParamLocation,
};
use crate::naming::{join_path, last_segment};
use crate::oas::lowering::DEFAULT_TAG;
use crate::resolver::TagPackages;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Parameter name given to an unwrapped bare array/map body.
pub const RAW_BODY_PARAM: &str = "rawBody";

/// Rewrites `{name}` path parameters into `:name` route syntax.
///
/// e.g. `/users/{id}/posts/{postId}` -> `/users/:id/posts/:postId`
pub fn rewrite_path(path: &str) -> String {
    static PATH_PARAM_RE: OnceLock<Regex> = OnceLock::new();
    let re = PATH_PARAM_RE.get_or_init(|| Regex::new(r"\{(.*?)\}").expect("Invalid regex"));
    re.replace_all(path, ":$1").into_owned()
}

/// Enriches all operations, grouped by tag package and ordered by it.
///
/// Tags missing from the document's tag list are reported in `diagnostics`.
pub fn enrich_operations(
    ctx: &EnrichContext<'_>,
    operations: &[Operation],
    diagnostics: &mut Vec<Diagnostic>,
) -> AppResult<Vec<OperationGroup>> {
    let mut by_package: BTreeMap<String, (TagPackages, String, Vec<&Operation>)> = BTreeMap::new();

    for op in operations {
        let packages = ctx.resolver.tag_packages(&op.tag);
        if !packages.declared && op.tag != DEFAULT_TAG {
            let known = diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::UndeclaredTag && d.subject == op.tag);
            if !known {
                tracing::warn!(tag = %op.tag, operation = %op.operation_id, "tag is not declared in the document");
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::UndeclaredTag,
                    subject: op.tag.clone(),
                    candidates: Vec::new(),
                });
            }
        }
        by_package
            .entry(packages.tag_path.clone())
            .or_insert_with(|| (packages, op.tag.clone(), Vec::new()))
            .2
            .push(op);
    }

    by_package
        .into_values()
        .map(|(packages, tag, ops)| enrich_group(ctx, packages, tag, &ops))
        .collect()
}

fn enrich_group(
    ctx: &EnrichContext<'_>,
    packages: TagPackages,
    tag: String,
    ops: &[&Operation],
) -> AppResult<OperationGroup> {
    let owner = group_identity(ctx, &packages);

    let mut units = Vec::with_capacity(ops.len());
    let mut imports = Vec::new();
    for op in ops {
        let (unit, op_imports) = enrich_operation(ctx, op, &owner)?;
        units.push(unit);
        imports.extend(op_imports);
    }

    let page_enabled = units.iter().any(|u| u.paginated);
    if page_enabled {
        imports.push(ctx.resolver.page_import());
    }
    let dropped = ctx.config.layout.dropped_operation_imports();
    imports.retain(|i| !dropped.contains(&i.path.as_str()));
    let imports = ctx.resolver.finalize_imports(&owner, imports);

    let settings = ctx
        .config
        .group_config
        .get(&tag)
        .or_else(|| ctx.config.group_config.get(&packages.tag_path))
        .cloned()
        .unwrap_or_default();

    tracing::debug!(
        tag = %tag,
        package = %packages.api.path,
        operations = units.len(),
        imports = imports.len(),
        "enriched operation group"
    );

    Ok(OperationGroup {
        has_any_params: units.iter().any(|u| u.has_params),
        page_package_alias: ctx.config.page_package_alias(),
        tag,
        tag_path: packages.tag_path,
        api: packages.api,
        handler: packages.handler,
        controller: packages.controller,
        operations: units,
        imports,
        page_enabled,
        settings,
    })
}

/// Identity of a group's API interface file in the layout's import style.
fn group_identity(ctx: &EnrichContext<'_>, packages: &TagPackages) -> String {
    let stem = last_segment(&packages.tag_path);
    match ctx.config.layout.import_style() {
        ImportStyle::Absolute => packages.api.path.clone(),
        ImportStyle::RelativeToFile => join_path([packages.api.path.as_str(), stem]),
        ImportStyle::FileName => stem.to_string(),
    }
}

/// Enriches one operation and returns the imports it contributes to its group.
pub fn enrich_operation(
    ctx: &EnrichContext<'_>,
    op: &Operation,
    owner_identity: &str,
) -> AppResult<(OperationUnit, Vec<ImportRef>)> {
    let resolver = ctx.resolver;
    let mut imports = Vec::new();

    let mut params: Vec<EnrichedParameter> = op
        .params
        .iter()
        .map(|p| {
            let field = enrich_field(ctx, &p.field, owner_identity);
            let import_alias = match (&p.location, &p.field.referenced_type) {
                (ParamLocation::Body, Some(type_name)) => Some(resolver.model_alias(type_name)),
                _ => None,
            };
            imports.extend(field.import.clone());
            EnrichedParameter {
                location: p.location,
                param_name: p.param_name.clone(),
                import_alias,
                field,
            }
        })
        .collect();

    let needs_raw_body = matches!(
        params.as_slice(),
        [only] if only.location == ParamLocation::Body
            && matches!(only.field.field.container, Container::Array | Container::Map)
    );
    if needs_raw_body {
        params[0].param_name = RAW_BODY_PARAM.to_string();
    }

    let mut return_import_alias = None;
    if let Some(rt) = &op.return_type {
        match &rt.referenced_type {
            Some(type_name) => {
                if ctx.index.get(type_name).is_none() {
                    return Err(AppError::Resolution {
                        type_name: type_name.clone(),
                        context: format!("return type of operation '{}'", op.operation_id),
                    });
                }
                return_import_alias = Some(resolver.model_alias(type_name));
                imports.extend(resolver.import_ref(type_name));
            }
            None => imports.extend(resolver.library_import(&rt.base_type)),
        }
    }

    let unit = OperationUnit {
        operation_id: op.operation_id.clone(),
        method: op.method.clone(),
        path: rewrite_path(&op.path),
        summary: op.summary.clone(),
        deprecated: op.deprecated,
        has_params: !params.is_empty(),
        has_file_param: params.iter().any(|p| p.field.field.is_file),
        params,
        return_type_is_nil: op.return_type.as_ref().is_some_and(|rt| rt.data_type == "nil"),
        return_type: op.return_type.clone(),
        return_import_alias,
        paginated: op.paginated,
        needs_raw_body,
    };
    tracing::debug!(
        operation = %unit.operation_id,
        method = %unit.method,
        path = %unit.path,
        "enriched operation"
    );
    Ok((unit, imports))
}
