#![deny(missing_docs)]

//! # Generator Configuration
//!
//! The immutable option bundle threaded through every resolver.
//! Loaded from YAML (camelCase keys) or built in code, then validated once
//! before enrichment starts.

use crate::error::{AppError, AppResult};
use crate::layout::OutputLayout;
use crate::naming::sanitize_name;
use crate::overrides::{TypeOverrides, DEFAULT_NO_ALIAS_PACKAGES};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Recognized generator options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Go module path every generated package is nested under.
    pub module_root: String,
    /// Package root for models. Defaults to `dto` (gin) or the API package (go-zero).
    pub model_package: Option<String>,
    /// Package root for API interfaces.
    pub api_package: String,
    /// Package root for request handlers.
    pub handler_package: String,
    /// Package root for controllers.
    pub controller_package: String,
    /// Vendor attribute carrying a schema's folder (e.g. `x-apifox-folder`). Empty disables folders.
    pub folder_attribute: String,
    /// Emit `pattern` conditions.
    pub support_pattern: bool,
    /// Emit `multipleOf` conditions.
    pub support_multiple_of: bool,
    /// Go layout string for date-time values.
    pub datetime_format: String,
    /// Go layout string for date values.
    pub date_format: String,
    /// Go layout string for time values.
    pub time_format: String,
    /// Package providing `Page` / `PageRequest` for `x-paginated` operations.
    pub page_package: String,
    /// Alias for the page package. Derived from the path when absent.
    pub page_package_alias: Option<String>,
    /// Extra packages that are always imported without an alias.
    pub no_alias_packages: BTreeSet<String>,
    /// Output tree shape.
    pub layout: OutputLayout,
    /// Extra schema type key -> Go type mappings.
    pub type_mappings: BTreeMap<String, String>,
    /// Extra Go type -> import path mappings.
    pub import_mappings: BTreeMap<String, String>,
    /// Per-tag settings merged into the operation group (go-zero-api `signature`, `jwt`, `middleware`).
    pub group_config: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module_root: "openapi-server".into(),
            model_package: None,
            api_package: "api".into(),
            handler_package: "handler".into(),
            controller_package: "controller".into(),
            folder_attribute: String::new(),
            support_pattern: false,
            support_multiple_of: false,
            datetime_format: "2006-01-02T15:04:05Z".into(),
            date_format: "2006-01-02".into(),
            time_format: "15:04:05".into(),
            page_package: "page".into(),
            page_package_alias: None,
            no_alias_packages: BTreeSet::new(),
            layout: OutputLayout::default(),
            type_mappings: BTreeMap::new(),
            import_mappings: BTreeMap::new(),
            group_config: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a YAML configuration file. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> AppResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Rejects configurations that cannot produce importable packages.
    pub fn validate(&self) -> AppResult<()> {
        validate_package_path("moduleRoot", &self.module_root)?;
        validate_package_path("modelPackage", self.model_package())?;
        validate_package_path("apiPackage", &self.api_package)?;
        validate_package_path("handlerPackage", &self.handler_package)?;
        validate_package_path("controllerPackage", &self.controller_package)?;
        Ok(())
    }

    /// Effective model package root.
    pub fn model_package(&self) -> &str {
        match &self.model_package {
            Some(pkg) => pkg.as_str(),
            None if self.layout.models_in_api_package() => self.api_package.as_str(),
            None => "dto",
        }
    }

    /// Effective alias of the page package.
    pub fn page_package_alias(&self) -> String {
        self.page_package_alias
            .clone()
            .unwrap_or_else(|| sanitize_name(&self.page_package))
    }

    /// Default library packages plus the configured ones.
    pub fn no_alias_packages(&self) -> BTreeSet<String> {
        DEFAULT_NO_ALIAS_PACKAGES
            .iter()
            .map(|s| s.to_string())
            .chain(self.no_alias_packages.iter().cloned())
            .collect()
    }

    /// The override table for this run: Go defaults, then layout quirks, then user mappings.
    pub fn overrides(&self) -> TypeOverrides {
        let mut overrides = TypeOverrides::default();
        if self.layout.date_time_as_string() {
            overrides
                .type_mapping
                .insert("DateTime".into(), "string".into());
        }
        overrides.with_mappings(&self.type_mappings, &self.import_mappings)
    }
}

fn validate_package_path(option: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Configuration(format!(
            "{} must not be empty",
            option
        )));
    }
    if value.starts_with('/') || value.contains('\\') || value.chars().any(char::is_whitespace)
    {
        return Err(AppError::Configuration(format!(
            "{} '{}' is not a valid import path",
            option, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_package(), "dto");
        assert_eq!(config.page_package_alias(), "page");
    }

    #[test]
    fn test_empty_module_root_is_fatal() {
        let config = GeneratorConfig {
            module_root: "  ".into(),
            ..Default::default()
        };
        match config.validate() {
            Err(AppError::Configuration(msg)) => assert!(msg.contains("moduleRoot")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_model_package_is_fatal() {
        let config = GeneratorConfig {
            model_package: Some("my models".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_yaml_keys_are_camel_case() {
        let yaml = r#"
moduleRoot: github.com/acme/shop
folderAttribute: x-apifox-folder
supportPattern: true
layout: go-zero
noAliasPackages: [github.com/shopspring/decimal]
"#;
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.module_root, "github.com/acme/shop");
        assert!(config.support_pattern);
        assert!(!config.support_multiple_of);
        assert_eq!(config.layout, OutputLayout::GoZero);
        assert_eq!(config.model_package(), "api");
        assert!(config
            .no_alias_packages()
            .contains("github.com/shopspring/decimal"));
        assert!(config.no_alias_packages().contains("time"));
    }

    #[test]
    fn test_go_zero_carries_date_time_as_string() {
        let config = GeneratorConfig {
            layout: OutputLayout::GoZero,
            ..Default::default()
        };
        assert_eq!(config.overrides().go_type("DateTime"), Some("string"));
        assert_eq!(
            GeneratorConfig::default().overrides().go_type("DateTime"),
            Some("time.Time")
        );
    }

    #[test]
    fn test_page_alias_is_sanitized_path() {
        let config = GeneratorConfig {
            page_package: "github.com/acme/kit/page".into(),
            ..Default::default()
        };
        assert_eq!(config.page_package_alias(), "github_com_acme_kit_page");
    }
}
