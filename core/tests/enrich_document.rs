//! End-to-end enrichment of whole OpenAPI documents.

use gosrv_core::conditions::ConditionRecord;
use gosrv_core::model::{DiagnosticKind, EnrichedField, ImportKind, ModelUnit, OperationGroup};
use gosrv_core::{
    enrich_document, ApiDocument, AppError, ConditionName, EnrichedTree, GeneratorConfig,
    OutputLayout,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

const SPEC: &str = r#"
openapi: 3.0.3
info: { title: Shop, version: 1.0.0 }
tags:
  - name: users
  - name: admin/Orders
paths:
  /users/{id}/posts/{postId}:
    get:
      operationId: getUserPost
      tags: [users]
      parameters:
        - { name: id, in: path, required: true, schema: { type: integer, format: int64 } }
        - { name: postId, in: path, required: true, schema: { type: string } }
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Post' }
  /users:
    get:
      operationId: listUsers
      tags: [users]
      x-paginated: true
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: array
                items: { $ref: '#/components/schemas/User' }
    post:
      operationId: createUsers
      tags: [users]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: array
              items: { $ref: '#/components/schemas/User' }
      responses:
        '201': { description: created }
  /admin/orders/{id}/items:
    put:
      operationId: replaceItems
      tags: [admin/orders]
      parameters:
        - { name: id, in: path, required: true, schema: { type: integer } }
      requestBody:
        content:
          application/json:
            schema:
              type: array
              items: { $ref: '#/components/schemas/Item' }
      responses:
        '204': { description: done }
  /reports:
    get:
      operationId: getReport
      tags: [reports]
      responses:
        '200':
          description: ok
          content:
            text/plain:
              schema: { type: string }
components:
  schemas:
    User:
      type: object
      x-folder: dto/user
      required: [login]
      properties:
        login: { type: string, minLength: 3, maxLength: 10, pattern: '^a' }
        email: { type: string, format: email }
        createdAt: { type: string, format: date-time, readOnly: true }
        posts:
          type: array
          items: { $ref: '#/components/schemas/Post' }
    Post:
      type: object
      x-folder: dto/post
      properties:
        author: { $ref: '#/components/schemas/User' }
        publishedAt: { type: string, format: date-time }
    Item:
      type: object
      x-folder: dto/order
      properties:
        sku: { type: string }
    item:
      type: object
      x-folder: dto/legacy
"#;

fn config(layout: OutputLayout) -> GeneratorConfig {
    GeneratorConfig {
        module_root: "github.com/acme/shop".into(),
        folder_attribute: "x-folder".into(),
        support_pattern: true,
        layout,
        group_config: BTreeMap::from([(
            "users".to_string(),
            BTreeMap::from([("jwt".to_string(), "Auth".to_string())]),
        )]),
        ..Default::default()
    }
}

fn enrich(layout: OutputLayout) -> EnrichedTree {
    let doc = ApiDocument::from_yaml(SPEC).unwrap();
    enrich_document(&doc, &config(layout)).unwrap()
}

fn model<'t>(tree: &'t EnrichedTree, name: &str) -> &'t ModelUnit {
    tree.models.iter().find(|m| m.name == name).unwrap()
}

fn field<'m>(model: &'m ModelUnit, name: &str) -> &'m EnrichedField {
    model.fields.iter().find(|f| f.field.name == name).unwrap()
}

fn group<'t>(tree: &'t EnrichedTree, tag_path: &str) -> &'t OperationGroup {
    tree.groups.iter().find(|g| g.tag_path == tag_path).unwrap()
}

fn import_paths(model: &ModelUnit) -> Vec<&str> {
    model.imports.iter().map(|i| i.path.as_str()).collect()
}

#[test]
fn test_enrichment_is_deterministic() {
    for layout in OutputLayout::ALL {
        let first = serde_json::to_string(&enrich(layout)).unwrap();
        let second = serde_json::to_string(&enrich(layout)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_no_unit_imports_itself() {
    for layout in OutputLayout::ALL {
        let tree = enrich(layout);
        for model in &tree.models {
            assert!(model.imports.iter().all(|i| i.path != model.import_path));
            for field in &model.fields {
                if let Some(import) = &field.import {
                    assert_ne!(import.path, model.import_path);
                }
            }
        }
    }
    let tree = enrich(OutputLayout::Gin);
    for group in &tree.groups {
        assert!(group.imports.iter().all(|i| i.path != group.api.path));
    }
}

#[test]
fn test_gin_model_packages_and_aliases() {
    let tree = enrich(OutputLayout::Gin);
    let user = model(&tree, "User");
    assert_eq!(user.package_path, "github.com/acme/shop/dto/user");
    assert_eq!(user.package_name, "user");
    assert_eq!(user.alias, "dto_user");
    assert_eq!(user.file_stem, "user");
    assert_eq!(
        import_paths(user),
        vec!["github.com/acme/shop/dto/post", "time"]
    );
    assert_eq!(user.imports[1].kind, ImportKind::Library);
    assert_eq!(user.imports[1].alias, "");

    let posts = field(user, "posts");
    assert!(posts.need_import);
    assert_eq!(posts.qualified_type, "[]dto_post.Post");

    let author = field(model(&tree, "Post"), "author");
    assert_eq!(author.qualified_type, "dto_user.User");
}

#[test]
fn test_condition_order_for_constrained_field() {
    let tree = enrich(OutputLayout::Gin);
    let user = model(&tree, "User");

    assert_eq!(
        field(user, "login").conditions,
        vec![
            ConditionRecord::new(ConditionName::MaxLength, 10),
            ConditionRecord::new(ConditionName::MinLength, 3),
            ConditionRecord::new(ConditionName::Pattern, "^a"),
            ConditionRecord::new(ConditionName::Required, true),
        ]
    );
    assert_eq!(
        field(user, "email").conditions,
        vec![ConditionRecord::new(ConditionName::IsEmail, true)]
    );

    let created = field(user, "createdAt");
    assert!(created.is_any_time);
    assert!(!created.has_conditions);
    assert_eq!(created.field.data_type, "time.Time");
}

#[test]
fn test_operation_groups() {
    let tree = enrich(OutputLayout::Gin);
    let tags: Vec<&str> = tree.groups.iter().map(|g| g.tag_path.as_str()).collect();
    assert_eq!(tags, vec!["admin/orders", "reports", "users"]);

    let users = group(&tree, "users");
    assert_eq!(users.api.path, "github.com/acme/shop/api/users");
    assert_eq!(users.api.alias, "api_users");
    assert_eq!(users.handler.name, "users");
    assert_eq!(users.controller.path, "github.com/acme/shop/controller/users");
    assert!(users.page_enabled);
    assert_eq!(users.page_package_alias, "page");
    assert!(users.has_any_params);
    assert_eq!(users.settings.get("jwt").map(String::as_str), Some("Auth"));

    let paths: Vec<&str> = users.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "github.com/acme/shop/dto/post",
            "github.com/acme/shop/dto/user",
            "page"
        ]
    );

    let get = &users.operations[0];
    assert_eq!(get.operation_id, "getUserPost");
    assert_eq!(get.path, "/users/:id/posts/:postId");
    assert_eq!(get.return_import_alias.as_deref(), Some("dto_post"));

    let report = &group(&tree, "reports").operations[0];
    assert_eq!(report.return_import_alias, None);
    assert!(!report.return_type_is_nil);
}

#[test]
fn test_bare_array_body_unwrap_only_for_single_parameter() {
    let tree = enrich(OutputLayout::Gin);

    let create = group(&tree, "users")
        .operations
        .iter()
        .find(|o| o.operation_id == "createUsers")
        .unwrap();
    assert!(create.needs_raw_body);
    assert_eq!(create.params.len(), 1);
    assert_eq!(create.params[0].param_name, "rawBody");
    assert_eq!(create.params[0].import_alias.as_deref(), Some("dto_user"));

    let replace = &group(&tree, "admin/orders").operations[0];
    assert!(!replace.needs_raw_body);
    assert_eq!(replace.params.len(), 2);
    assert_eq!(replace.params[1].param_name, "body");
}

#[test]
fn test_diagnostics_are_collected() {
    let tree = enrich(OutputLayout::Gin);
    assert_eq!(tree.diagnostics.len(), 2);
    assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::AmbiguousTypeName);
    assert_eq!(tree.diagnostics[0].candidates, vec!["Item", "item"]);
    assert_eq!(tree.diagnostics[1].kind, DiagnosticKind::UndeclaredTag);
    assert_eq!(tree.diagnostics[1].subject, "reports");
}

#[test]
fn test_go_zero_uses_file_relative_imports() {
    let tree = enrich(OutputLayout::GoZero);
    let user = model(&tree, "User");
    assert_eq!(user.import_path, "github.com/acme/shop/api/dto/user/user");
    assert_eq!(import_paths(user), vec!["../post/post"]);

    let created = field(user, "createdAt");
    assert_eq!(created.field.data_type, "string");
    assert!(created.is_any_time);
    assert_eq!(created.time_layout.as_deref(), Some("2006-01-02T15:04:05Z"));

    let users = group(&tree, "users");
    let paths: Vec<&str> = users.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["../dto/post/post", "../dto/user/user", "page"]);
}

#[test]
fn test_go_zero_api_imports_by_file_name() {
    let tree = enrich(OutputLayout::GoZeroApi);
    let user = model(&tree, "User");
    assert_eq!(user.import_path, "user");
    assert_eq!(import_paths(user), vec!["post"]);
    assert_eq!(field(user, "posts").qualified_type, "[]Post");
}

#[test]
fn test_undeclared_return_type_is_a_resolution_error() {
    let spec = r#"
openapi: 3.0.3
paths:
  /ghosts:
    get:
      operationId: getGhost
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Ghost' }
"#;
    let doc = ApiDocument::from_yaml(spec).unwrap();
    match enrich_document(&doc, &GeneratorConfig::default()) {
        Err(AppError::Resolution { type_name, .. }) => assert_eq!(type_name, "Ghost"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected a resolution error"),
    }
}

const EDGE_SPEC: &str = r#"
openapi: 3.0.3
tags:
  - name: users
paths:
  /users:
    post:
      operationId: createUser
      tags: [users]
      requestBody:
        content:
          application/json:
            schema: { $ref: '#/components/schemas/User' }
      responses:
        '201': { description: created }
  /users/tags:
    put:
      operationId: putTags
      tags: [users]
      requestBody:
        content:
          application/json:
            schema:
              type: object
              additionalProperties: { type: string }
      responses:
        '204': { description: done }
components:
  schemas:
    Email:
      type: string
      format: email
    User:
      type: object
      x-folder: dto/user
      properties:
        email: { $ref: '#/components/schemas/Email' }
        birthday: { type: string, format: date }
        opensAt: { type: string, format: time }
        labels:
          type: object
          minProperties: 1
          additionalProperties: { type: string }
"#;

fn enrich_edges() -> EnrichedTree {
    let doc = ApiDocument::from_yaml(EDGE_SPEC).unwrap();
    enrich_document(&doc, &config(OutputLayout::Gin)).unwrap()
}

#[test]
fn test_scalar_alias_is_inlined_without_a_model() {
    let tree = enrich_edges();
    let names: Vec<&str> = tree.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["User"]);

    let email = field(model(&tree, "User"), "email");
    assert_eq!(email.field.data_type, "string");
    assert!(!email.need_import);
    assert_eq!(
        email.conditions,
        vec![ConditionRecord::new(ConditionName::IsEmail, true)]
    );
}

#[test]
fn test_property_counts_emit_no_directive() {
    let tree = enrich_edges();
    let labels = field(model(&tree, "User"), "labels");
    assert_eq!(labels.field.data_type, "map[string]string");
    assert!(labels.conditions.is_empty());
    assert!(!labels.has_conditions);
}

#[test]
fn test_date_and_time_formats_are_any_time() {
    let tree = enrich_edges();
    let user = model(&tree, "User");

    let birthday = field(user, "birthday");
    assert!(birthday.is_any_time);
    assert_eq!(birthday.time_layout.as_deref(), Some("2006-01-02"));

    let opens_at = field(user, "opensAt");
    assert!(opens_at.is_any_time);
    assert_eq!(opens_at.time_layout.as_deref(), Some("15:04:05"));
    assert!(!opens_at.has_conditions);
}

#[test]
fn test_only_bare_container_bodies_become_raw_body() {
    let tree = enrich_edges();
    let users = group(&tree, "users");
    let operation = |id: &str| {
        users
            .operations
            .iter()
            .find(|o| o.operation_id == id)
            .unwrap()
    };

    let put_tags = operation("putTags");
    assert!(put_tags.needs_raw_body);
    let names: Vec<&str> = put_tags.params.iter().map(|p| p.param_name.as_str()).collect();
    assert_eq!(names, vec!["rawBody"]);

    let create = operation("createUser");
    assert!(!create.needs_raw_body);
    assert_eq!(create.params.len(), 1);
    assert_eq!(create.params[0].param_name, "user");
    assert_eq!(create.params[0].import_alias.as_deref(), Some("dto_user"));
}
