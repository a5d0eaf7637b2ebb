#![deny(missing_docs)]

//! # Model Enrichment
//!
//! Attaches package metadata, per-field imports and conditions to every
//! generated model, and builds each model's import set.

use crate::enrich::{enrich_field, EnrichContext};
use crate::error::AppResult;
use crate::layout::ImportStyle;
use crate::model::{EnrichedField, Model, ModelUnit};

/// Enriches every model that is generated. Models whose class name is
/// redirected to another type are skipped.
pub fn enrich_models(ctx: &EnrichContext<'_>, models: &[Model]) -> AppResult<Vec<ModelUnit>> {
    models
        .iter()
        .filter(|m| {
            let mapped = ctx.resolver.overrides().is_mapped_target(&m.class_name);
            if mapped {
                tracing::debug!(model = %m.name, class = %m.class_name, "skipping mapped model");
            }
            !mapped
        })
        .map(|m| enrich_model(ctx, m))
        .collect()
}

/// Enriches one model.
pub fn enrich_model(ctx: &EnrichContext<'_>, model: &Model) -> AppResult<ModelUnit> {
    let resolver = ctx.resolver;
    let identity = resolver.model_import_identity(&model.name);

    let fields: Vec<EnrichedField> = model
        .fields
        .iter()
        .map(|f| enrich_field(ctx, f, &identity))
        .collect();

    let mut imports: Vec<_> = fields.iter().filter_map(|f| f.import.clone()).collect();
    let mut one_ofs = Vec::with_capacity(model.one_of.len());
    for member in &model.one_of {
        let class_name = resolver.overrides().model_class_name(member);
        match resolver.import_ref(member).filter(|i| i.path != identity) {
            Some(import) => {
                let qualified = import.is_model_import()
                    && ctx.config.layout.import_style() == ImportStyle::Absolute;
                one_ofs.push(if qualified {
                    format!("{}.{}", import.qualifier(), class_name)
                } else {
                    class_name
                });
                imports.push(import);
            }
            None => one_ofs.push(class_name),
        }
    }

    let package_path = resolver.model_package_path(&model.name);
    let imports = resolver.finalize_imports(&identity, imports);
    tracing::debug!(
        model = %model.name,
        package = %package_path,
        imports = imports.len(),
        "enriched model"
    );

    Ok(ModelUnit {
        name: model.name.clone(),
        class_name: model.class_name.clone(),
        description: model.description.clone(),
        package_name: resolver.package_name(&model.name),
        alias: resolver.model_alias(&model.name),
        file_stem: resolver.file_stem(&model.name),
        import_path: identity,
        package_path,
        fields,
        imports,
        is_one_of: !one_ofs.is_empty(),
        one_ofs,
        enum_values: model.enum_values.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ConditionName;
    use crate::config::GeneratorConfig;
    use crate::layout::OutputLayout;
    use crate::oas::index::SchemaIndex;
    use crate::oas::lowering::Lowering;
    use crate::oas::shims::ApiDocument;
    use crate::resolver::PackageResolver;

    const DOC: &str = r#"
components:
  schemas:
    Profile:
      type: object
      x-folder: dto/user
      properties:
        bio: { type: string, maxLength: 200 }
    User:
      type: object
      x-folder: dto/user
      required: [login]
      properties:
        login: { type: string, minLength: 3 }
        profile: { $ref: '#/components/schemas/Profile' }
        orders: { type: array, items: { $ref: '#/components/schemas/Order' } }
        createdAt: { type: string, format: date-time }
    Order:
      type: object
      x-folder: dto/order
    Pet:
      oneOf:
        - $ref: '#/components/schemas/User'
        - $ref: '#/components/schemas/Order'
    File:
      type: object
"#;

    fn units(layout: OutputLayout) -> Vec<ModelUnit> {
        let doc = ApiDocument::from_yaml(DOC).unwrap();
        let config = GeneratorConfig {
            module_root: "shop".into(),
            folder_attribute: "x-folder".into(),
            layout,
            ..Default::default()
        };
        let overrides = config.overrides();
        let index = SchemaIndex::new(&doc);
        let resolver = PackageResolver::new(&config, &index, &overrides);
        let models = Lowering::new(&index, &overrides).models().unwrap();
        let ctx = EnrichContext {
            config: &config,
            index: &index,
            resolver: &resolver,
            flags: (&config).into(),
        };
        enrich_models(&ctx, &models).unwrap()
    }

    fn unit<'u>(units: &'u [ModelUnit], name: &str) -> &'u ModelUnit {
        units.iter().find(|u| u.name == name).unwrap()
    }

    #[test]
    fn test_mapped_models_are_skipped() {
        let units = units(OutputLayout::Gin);
        let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Profile", "User", "Order", "Pet"]);
    }

    #[test]
    fn test_same_package_reference_needs_no_import() {
        let units = units(OutputLayout::Gin);
        let user = unit(&units, "User");
        assert_eq!(user.package_path, "shop/dto/user");
        assert_eq!(user.package_name, "user");
        assert_eq!(user.alias, "dto_user");

        let profile = user.fields.iter().find(|f| f.field.name == "profile").unwrap();
        assert!(!profile.need_import);
        assert!(profile.import.is_none());
        assert_eq!(profile.qualified_type, "Profile");

        let orders = user.fields.iter().find(|f| f.field.name == "orders").unwrap();
        assert!(orders.need_import);
        assert_eq!(orders.qualified_type, "[]dto_order.Order");

        let paths: Vec<&str> = user.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["shop/dto/order", "time"]);
        assert!(user.imports.iter().all(|i| i.path != user.import_path));
    }

    #[test]
    fn test_field_conditions_and_time_layout() {
        let units = units(OutputLayout::Gin);
        let user = unit(&units, "User");
        let login = &user.fields[0];
        let names: Vec<ConditionName> = login.conditions.iter().map(|c| c.name).collect();
        assert_eq!(names, vec![ConditionName::MinLength, ConditionName::Required]);

        let created = user.fields.iter().find(|f| f.field.name == "createdAt").unwrap();
        assert!(created.is_any_time);
        assert!(!created.has_conditions);
        assert_eq!(created.time_layout.as_deref(), Some("2006-01-02T15:04:05Z"));
    }

    #[test]
    fn test_one_of_members_are_qualified() {
        let units = units(OutputLayout::Gin);
        let pet = unit(&units, "Pet");
        assert!(pet.is_one_of);
        assert_eq!(pet.one_ofs, vec!["dto_user.User", "dto_order.Order"]);
        assert_eq!(pet.imports.len(), 2);
    }

    #[test]
    fn test_go_zero_imports_are_relative() {
        let units = units(OutputLayout::GoZero);
        let user = unit(&units, "User");
        assert_eq!(user.import_path, "shop/api/dto/user/user");
        let profile = user.fields.iter().find(|f| f.field.name == "profile").unwrap();
        assert!(profile.need_import);
        assert_eq!(profile.qualified_type, "Profile");

        let paths: Vec<&str> = user.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["../order/order", "profile"]);
    }

    #[test]
    fn test_go_zero_api_imports_by_file_name() {
        let units = units(OutputLayout::GoZeroApi);
        let user = unit(&units, "User");
        assert_eq!(user.import_path, "user");
        let paths: Vec<&str> = user.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["order", "profile"]);
    }
}
