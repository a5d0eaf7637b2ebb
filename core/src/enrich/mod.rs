#![deny(missing_docs)]

//! # Enrichment
//!
//! Single pass from a parsed document to the enriched tree a renderer consumes.
//!
//! 1. The configuration is validated; nothing is enriched on failure.
//! 2. The document is indexed and lowered into flat records.
//! 3. Models and operation groups are enriched with packages, aliases,
//!    import sets and validation conditions.
//!
//! The pass is deterministic: the same document and configuration always
//! produce the same tree.

pub mod models;
pub mod operations;

use crate::conditions::{derive_conditions, time_layout, ConditionFlags};
use crate::config::GeneratorConfig;
use crate::error::AppResult;
use crate::layout::ImportStyle;
use crate::model::{EnrichedField, EnrichedTree, Field};
use crate::oas::index::SchemaIndex;
use crate::oas::lowering::Lowering;
use crate::oas::shims::ApiDocument;
use crate::resolver::PackageResolver;

/// Everything the enrichers share during one run.
pub struct EnrichContext<'a> {
    /// Validated configuration.
    pub config: &'a GeneratorConfig,
    /// Document lookups.
    pub index: &'a SchemaIndex<'a>,
    /// Package and alias resolution.
    pub resolver: &'a PackageResolver<'a>,
    /// Active condition feature flags.
    pub flags: ConditionFlags,
}

/// Enriches a whole document.
pub fn enrich_document(doc: &ApiDocument, config: &GeneratorConfig) -> AppResult<EnrichedTree> {
    config.validate()?;

    let overrides = config.overrides();
    let index = SchemaIndex::new(doc);
    let resolver = PackageResolver::new(config, &index, &overrides);
    let lowering = Lowering::new(&index, &overrides);

    let models = lowering.models()?;
    let ops = lowering.operations()?;
    tracing::info!(
        layout = %config.layout,
        module_root = %config.module_root,
        models = models.len(),
        operations = ops.len(),
        "enriching document"
    );

    let ctx = EnrichContext {
        config,
        index: &index,
        resolver: &resolver,
        flags: ConditionFlags::from(config),
    };

    let mut diagnostics = index.ambiguities().to_vec();
    let model_units = models::enrich_models(&ctx, &models)?;
    let groups = operations::enrich_operations(&ctx, &ops, &mut diagnostics)?;

    Ok(EnrichedTree {
        layout: config.layout,
        module_root: config.module_root.clone(),
        models: model_units,
        groups,
        diagnostics,
    })
}

/// Resolves a field's import and derives its conditions.
///
/// `owner_identity` is the importing unit's identity in the layout's import
/// style; an import of the owner itself is dropped.
pub fn enrich_field(ctx: &EnrichContext<'_>, field: &Field, owner_identity: &str) -> EnrichedField {
    let import = match &field.referenced_type {
        Some(type_name) => ctx.resolver.import_ref(type_name),
        None => ctx.resolver.library_import(&field.base_type),
    }
    .filter(|import| import.path != owner_identity);

    let need_import = import.as_ref().is_some_and(|i| i.is_model_import());
    let qualified_type = match &import {
        Some(i) if need_import && ctx.config.layout.import_style() == ImportStyle::Absolute => {
            qualify(&field.data_type, &field.base_type, i.qualifier())
        }
        _ => field.data_type.clone(),
    };

    let derived = derive_conditions(field, ctx.flags);
    EnrichedField {
        qualified_type,
        import,
        need_import,
        conditions: derived.conditions,
        has_conditions: derived.has_conditions,
        is_any_time: field.format.is_any_time(),
        time_layout: time_layout(field.format, ctx.config),
        field: field.clone(),
    }
}

/// Prefixes the innermost type with a package qualifier: `[]User` -> `[]dto_user.User`.
pub fn qualify(data_type: &str, base_type: &str, qualifier: &str) -> String {
    if qualifier.is_empty() {
        return data_type.to_string();
    }
    match data_type.strip_suffix(base_type) {
        Some(prefix) => format!("{}{}.{}", prefix, qualifier, base_type),
        None => data_type.to_string(),
    }
}
