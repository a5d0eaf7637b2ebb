#![deny(missing_docs)]

//! # Package Resolver
//!
//! Decides which Go package a generated type or tag lives in, which alias
//! importers must use for it, and how import paths are written for each
//! output layout.
//!
//! - Model packages are `moduleRoot/modelPackage/folder`, where the folder is
//!   read from a vendor attribute on the schema.
//! - Tag packages are `moduleRoot/{api,handler,controller}Package/tag`.
//! - An alias is only produced when the sanitized module-relative path differs
//!   from the package's default identifier.

use crate::config::GeneratorConfig;
use crate::layout::ImportStyle;
use crate::model::{ImportKind, ImportRef, PackageRef};
use crate::naming::{join_path, last_segment, sanitize_name, to_snake_case, underscore_hyphens};
use crate::oas::index::SchemaIndex;
use crate::overrides::{TypeOverrides, TypeTarget};
use std::collections::{BTreeMap, BTreeSet};

/// Resolves package paths, aliases and import sets against one document.
pub struct PackageResolver<'a> {
    config: &'a GeneratorConfig,
    index: &'a SchemaIndex<'a>,
    overrides: &'a TypeOverrides,
    no_alias: BTreeSet<String>,
    model_root: String,
}

/// Packages generated for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPackages {
    /// Package sub-path derived from the tag.
    pub tag_path: String,
    /// Whether the tag is declared in the document.
    pub declared: bool,
    /// API interface package.
    pub api: PackageRef,
    /// Handler package.
    pub handler: PackageRef,
    /// Controller package.
    pub controller: PackageRef,
}

impl<'a> PackageResolver<'a> {
    /// Creates a resolver for a validated configuration.
    pub fn new(
        config: &'a GeneratorConfig,
        index: &'a SchemaIndex<'a>,
        overrides: &'a TypeOverrides,
    ) -> Self {
        let model_root = config
            .model_package()
            .replace('.', "/")
            .trim_matches('/')
            .to_string();
        Self {
            config,
            index,
            overrides,
            no_alias: config.no_alias_packages(),
            model_root,
        }
    }

    /// The override table in use.
    pub fn overrides(&self) -> &TypeOverrides {
        self.overrides
    }

    /// Folder of a type, relative to the model package root.
    ///
    /// Absent attribute, unknown type or a folder naming the root itself all
    /// yield an empty folder.
    pub fn resolve_folder(&self, type_name: &str) -> String {
        let raw = self
            .index
            .attribute(type_name, &self.config.folder_attribute)
            .unwrap_or_default();
        let folder = raw.trim().trim_matches('/');

        if folder == self.model_root {
            return String::new();
        }
        let stripped = folder
            .strip_prefix(&self.model_root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(folder);
        stripped.trim_matches('/').to_string()
    }

    /// Package path of a type.
    ///
    /// Library types resolve to their fixed import path; built-in types
    /// resolve to `None`.
    pub fn resolve_package_path(&self, type_name: &str) -> Option<String> {
        let class_name = self.overrides.model_class_name(type_name);
        match self.overrides.target(&class_name) {
            TypeTarget::External(path) => Some(path.to_string()),
            TypeTarget::Builtin => None,
            TypeTarget::Generated => Some(self.model_package_path(type_name)),
        }
    }

    /// Absolute package path of a generated model.
    pub fn model_package_path(&self, type_name: &str) -> String {
        let folder = self.resolve_folder(type_name);
        // Go module paths may contain '-', package directories below them may not.
        let relative = underscore_hyphens(&join_path([self.model_root.as_str(), &folder]));
        join_path([self.config.module_root.as_str(), &relative])
    }

    /// Go `package` clause of a generated type.
    pub fn package_name(&self, type_name: &str) -> String {
        let folder = self.resolve_folder(type_name);
        let relative = join_path([self.model_root.as_str(), &folder]);
        underscore_hyphens(last_segment(&relative))
    }

    /// Alias of the package a generated type lives in.
    pub fn model_alias(&self, type_name: &str) -> String {
        self.resolve_package_path(type_name)
            .map(|path| self.resolve_alias(&path))
            .unwrap_or_default()
    }

    /// Alias importers must use for a package path. Empty when the default
    /// identifier (last path segment) already matches.
    pub fn resolve_alias(&self, path: &str) -> String {
        if self.no_alias.contains(path) {
            return String::new();
        }
        let module_root = self.config.module_root.as_str();
        let relative = if path == module_root {
            ""
        } else {
            path.strip_prefix(module_root)
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(path)
        };
        let alias = sanitize_name(relative.trim_matches('/'));
        if alias.eq_ignore_ascii_case(last_segment(path)) {
            String::new()
        } else {
            alias
        }
    }

    /// File stem of a generated model.
    pub fn file_stem(&self, type_name: &str) -> String {
        to_snake_case(&sanitize_name(&self.overrides.model_class_name(type_name)))
    }

    /// Identity of a generated model in the layout's import style.
    ///
    /// gin imports packages, go-zero imports files below the module root and
    /// go-zero `.api` files import siblings by file name.
    pub fn model_import_identity(&self, type_name: &str) -> String {
        match self.config.layout.import_style() {
            ImportStyle::Absolute => self.model_package_path(type_name),
            ImportStyle::RelativeToFile => join_path([
                self.model_package_path(type_name).as_str(),
                &self.file_stem(type_name),
            ]),
            ImportStyle::FileName => self.file_stem(type_name),
        }
    }

    /// Import of a type referenced by schema name.
    ///
    /// Generated models get a model import whose path is their import
    /// identity; the alias is always computed on the absolute package path.
    pub fn import_ref(&self, type_name: &str) -> Option<ImportRef> {
        let class_name = self.overrides.model_class_name(type_name);
        match self.overrides.target(&class_name) {
            TypeTarget::External(path) => Some(self.library_import_path(path)),
            TypeTarget::Builtin => None,
            TypeTarget::Generated => Some(ImportRef {
                path: self.model_import_identity(type_name),
                alias: self.model_alias(type_name),
                kind: ImportKind::Model,
            }),
        }
    }

    /// Library import of a Go type (`time.Time` -> `time`), if it has one.
    pub fn library_import(&self, go_type: &str) -> Option<ImportRef> {
        match self.overrides.target(go_type) {
            TypeTarget::External(path) => Some(self.library_import_path(path)),
            TypeTarget::Builtin | TypeTarget::Generated => None,
        }
    }

    fn library_import_path(&self, path: &str) -> ImportRef {
        ImportRef {
            path: path.to_string(),
            alias: self.resolve_alias(path),
            kind: ImportKind::Library,
        }
    }

    /// Turns collected imports into the final import set of one unit.
    ///
    /// Imports are deduplicated by path (first wins), imports of the owner
    /// itself are dropped, go-zero model imports are made relative to the
    /// owner's file and the result is sorted by path.
    pub fn finalize_imports(
        &self,
        owner_identity: &str,
        imports: impl IntoIterator<Item = ImportRef>,
    ) -> Vec<ImportRef> {
        let mut unique: BTreeMap<String, ImportRef> = BTreeMap::new();
        for import in imports {
            unique.entry(import.path.clone()).or_insert(import);
        }
        let kept = filter_self_imports(owner_identity, unique.into_values().collect());

        let mut shaped: Vec<ImportRef> = kept
            .into_iter()
            .map(|mut import| {
                if self.relativizes(&import) {
                    import.path = to_relative(owner_identity, &import.path);
                }
                import
            })
            .collect();
        shaped.sort_by(|a, b| a.path.cmp(&b.path));
        shaped
    }

    fn relativizes(&self, import: &ImportRef) -> bool {
        self.config.layout.import_style() == ImportStyle::RelativeToFile
            && import.is_model_import()
            && import
                .path
                .strip_prefix(self.config.module_root.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Package sub-path of a tag. Declared tags are matched first, exactly and
    /// then case-insensitively, so the declared spelling wins.
    ///
    /// Every `/` segment is sanitized and snake-cased, not only the last one,
    /// and an undeclared tag still gets its own package path instead of
    /// falling back to the root API package.
    pub fn resolve_tag(&self, tag: &str) -> (String, bool) {
        let declared = self.index.find_tag(tag);
        let name = declared.map(|t| t.name.as_str()).unwrap_or(tag);
        let segments: Vec<String> = name
            .split('/')
            .map(|segment| to_snake_case(&sanitize_name(segment.trim())))
            .filter(|segment| !segment.is_empty())
            .collect();
        let tag_path = if segments.is_empty() {
            "default".to_string()
        } else {
            segments.join("/")
        };
        (tag_path, declared.is_some())
    }

    /// API interface, handler and controller packages of a tag.
    pub fn tag_packages(&self, tag: &str) -> TagPackages {
        let (tag_path, declared) = self.resolve_tag(tag);
        TagPackages {
            api: self.tag_package(&self.config.api_package, &tag_path),
            handler: self.tag_package(&self.config.handler_package, &tag_path),
            controller: self.tag_package(&self.config.controller_package, &tag_path),
            tag_path,
            declared,
        }
    }

    fn tag_package(&self, root: &str, tag_path: &str) -> PackageRef {
        // Module root keeps its hyphens, as in `model_package_path`.
        let relative = underscore_hyphens(&join_path([root, tag_path]));
        let path = join_path([self.config.module_root.as_str(), &relative]);
        PackageRef {
            alias: self.resolve_alias(&path),
            name: last_segment(&relative).to_string(),
            path,
        }
    }

    /// Import of the page package used by paginated operations.
    pub fn page_import(&self) -> ImportRef {
        ImportRef {
            path: self.config.page_package.clone(),
            alias: self.config.page_package_alias(),
            kind: ImportKind::Library,
        }
    }
}

/// Drops imports whose path equals the owner's.
pub fn filter_self_imports(owner_path: &str, imports: Vec<ImportRef>) -> Vec<ImportRef> {
    imports
        .into_iter()
        .filter(|import| import.path != owner_path)
        .collect()
}

/// Relative path from the parent directory of `from` to `to`.
///
/// e.g. from `m/dto/order/order` to `m/dto/user/profile` is `../user/profile`.
pub fn to_relative(from: &str, to: &str) -> String {
    let from_segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let parent = &from_segments[..from_segments.len().saturating_sub(1)];
    let to_segments: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = parent
        .iter()
        .zip(to_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; parent.len() - common];
    parts.extend(&to_segments[common..]);
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
