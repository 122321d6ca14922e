use dtogen_core::{compile, TypeDefinition, TypeRef, TypeShape};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const COMPUTE: &str = r#"
openapi: 3.0.3
info: { title: Compute, version: v1 }
components:
  schemas:
    Instance:
      description: A virtual machine.
      allOf:
        - $ref: '#/components/schemas/Resource'
        - properties:
            spec: { $ref: '#/components/schemas/InstanceSpec' }
            status: { $ref: '#/components/schemas/InstanceStatus' }
    InstanceSpec:
      type: object
      required: [flavor]
      properties:
        flavor: { type: string, description: Machine size. }
        priority: { $ref: '#/components/schemas/Priority' }
        labels: { $ref: '#/components/schemas/Labels' }
        tags:
          type: array
          items: { type: string }
          default: [web]
          description: Free-form tags.
        endpoint:
          oneOf:
            - { type: string }
            - { type: string }
        boot:
          allOf:
            - $ref: '#/components/schemas/Volume'
            - properties:
                image: { type: string }
    InstanceStatus:
      allOf:
        - properties:
            phase: { type: string }
          required: [phase]
        - oneOf:
            - { title: phase, type: string }
            - { title: message, type: string }
"#;

const SHARED: &str = r#"
components:
  schemas:
    Resource:
      type: object
      properties:
        metadata: { $ref: '#/components/schemas/Metadata' }
    Metadata:
      type: object
      required: [name]
      properties:
        name: { type: string }
        region: { type: string, default: eu-central }
    Priority:
      type: integer
      enum: [1, 2]
      x-enumNames: [Low, High]
    Labels:
      type: object
      additionalProperties: { type: string }
    Volume:
      type: object
      properties:
        size: { type: integer, default: 10 }
"#;

const MANIFEST: &str = r#"
sdkVersion: v0.1.0
resources:
  Instance:
    package: compute/instance
    apiPackage: sdk/compute/v1
    input:
      - Spec
      - Metadata
    output:
      - Status
      - name: Ready
        type: "*bool"
        description: Whether the machine is up.
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("schemas/shared")).unwrap();
        fs::write(dir.path().join("schemas/compute.yaml"), COMPUTE).unwrap();
        fs::write(dir.path().join("schemas/shared/common.yml"), SHARED).unwrap();
        fs::write(dir.path().join("schemas/broken.yaml"), "components: [").unwrap();
        fs::write(dir.path().join("pulumi.gen.yaml"), MANIFEST).unwrap();
        Self { dir }
    }

    fn schemas(&self) -> PathBuf {
        self.dir.path().join("schemas")
    }

    fn manifest(&self) -> PathBuf {
        self.dir.path().join("pulumi.gen.yaml")
    }
}

fn find<'m>(types: &'m [TypeDefinition], name: &str) -> &'m TypeDefinition {
    types
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("missing type {}", name))
}

#[test]
fn test_compile_is_idempotent() {
    let fixture = Fixture::new();
    let first = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    let second = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_no_dangling_references_and_no_duplicates() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    assert!(model.dangling.is_empty(), "dangling: {:?}", model.dangling);

    let mut seen = HashSet::new();
    for def in &model.types {
        assert!(seen.insert(def.name.clone()), "duplicate {}", def.name);
    }
    assert!(model.types.iter().all(|t| t.name != "Instance"));
}

#[test]
fn test_type_order_follows_index_with_helpers_inline() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    let names: Vec<&str> = model.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "InstanceSpec",
            "InstanceSpecEndpoint",
            "InstanceSpecBoot",
            "InstanceStatus",
            "Resource",
            "Metadata",
            "Priority",
            "Labels",
            "Volume",
        ]
    );
}

#[test]
fn test_enum_round_trip() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    match &find(&model.types, "Priority").shape {
        TypeShape::Enum { base, values } => {
            assert_eq!(*base, TypeRef::Int);
            let pairs: Vec<(&str, &str)> = values
                .iter()
                .map(|v| (v.name.as_str(), v.literal.as_str()))
                .collect();
            assert_eq!(pairs, vec![("Low", "1"), ("High", "2")]);
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn test_map_alias() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    let labels = find(&model.types, "Labels");
    assert_eq!(
        labels.shape,
        TypeShape::Alias {
            target: TypeRef::map(TypeRef::String),
            distinct: false
        }
    );
}

#[test]
fn test_union_variant_names_are_disambiguated() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    let endpoint = find(&model.types, "InstanceSpecEndpoint");
    let names: Vec<&str> = endpoint
        .fields()
        .iter()
        .map(|f| f.exported_name.as_str())
        .collect();
    assert_eq!(names, vec!["String", "String2"]);
}

#[test]
fn test_and_rule_across_folded_union() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    let status = find(&model.types, "InstanceStatus");
    let phase = status.fields().iter().find(|f| f.name == "phase").unwrap();
    assert!(!phase.optional);
    assert_eq!(phase.ty, TypeRef::String);
    let message = status.fields().iter().find(|f| f.name == "message").unwrap();
    assert!(message.optional);
}

#[test]
fn test_composite_default_excluded() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    let spec = find(&model.types, "InstanceSpec");
    let tags = spec.fields().iter().find(|f| f.name == "tags").unwrap();
    assert!(!tags.has_default());
    assert_eq!(tags.description.as_deref(), Some("Free-form tags."));

    let lines: Vec<String> = spec.annotations.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "a.Describe(&dto.Flavor, \"Machine size.\")",
            "a.Describe(&dto.Tags, \"Free-form tags.\")",
        ]
    );
}

#[test]
fn test_helper_merges_referenced_parent() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    let boot = find(&model.types, "InstanceSpecBoot");
    let names: Vec<&str> = boot.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["size", "image"]);
    assert_eq!(boot.fields()[0].default.as_deref(), Some("10"));
}

#[test]
fn test_resources() {
    let fixture = Fixture::new();
    let model = compile(&fixture.schemas(), &fixture.manifest()).unwrap();
    assert_eq!(model.sdk_version.as_deref(), Some("v0.1.0"));
    assert_eq!(model.resources.len(), 1);

    let instance = &model.resources[0];
    assert_eq!(instance.api_package_id, "v1");
    assert_eq!(instance.description.as_deref(), Some("A virtual machine."));

    let inputs: Vec<String> = instance.inputs.iter().map(|f| f.ty.to_string()).collect();
    assert_eq!(inputs, vec!["InstanceSpec", "*Metadata"]);
    let outputs: Vec<String> = instance.outputs.iter().map(|f| f.ty.to_string()).collect();
    assert_eq!(outputs, vec!["InstanceStatus", "*bool"]);

    let lines: Vec<String> = instance
        .output_annotations
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(lines, vec!["a.Describe(&dto.Ready, \"Whether the machine is up.\")"]);
}

#[test]
fn test_missing_manifest_is_fatal() {
    let fixture = Fixture::new();
    let result = compile(&fixture.schemas(), &fixture.dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(dtogen_core::AppError::Manifest(_))));
}

#[test]
fn test_missing_schema_root_compiles_empty() {
    let fixture = Fixture::new();
    let model = compile(&fixture.dir.path().join("nope"), &fixture.manifest()).unwrap();
    assert!(model.types.is_empty());
    assert_eq!(model.resources.len(), 1);
    // with no schemas every resource field falls back to its bare name
    assert!(model.dangling.contains(&"Spec".to_string()));
}
