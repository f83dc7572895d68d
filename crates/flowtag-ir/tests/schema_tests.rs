// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use flowtag_ir::types::{FieldDecl, SchemaDecl, TypeDecl, TypeFactory};
use flowtag_ir::{AccessPathSelectors, AccessPathSelectorsSet, IrError};

fn chains(list: &[&[&str]]) -> AccessPathSelectorsSet {
    list.iter()
        .map(|fields| AccessPathSelectors::from_fields(fields.iter().copied()))
        .collect()
}

fn person() -> SchemaDecl {
    SchemaDecl::named(
        "Person",
        vec![
            FieldDecl::new("name", TypeDecl::Primitive),
            FieldDecl::new("address", TypeDecl::named("Address")),
            FieldDecl::new(
                "contact",
                TypeDecl::Schema(SchemaDecl::inline(vec![
                    FieldDecl::new("email", TypeDecl::Primitive),
                    FieldDecl::new("phone", TypeDecl::Primitive),
                ])),
            ),
        ],
    )
}

fn address() -> SchemaDecl {
    SchemaDecl::named(
        "Address",
        vec![
            FieldDecl::new("street", TypeDecl::Primitive),
            FieldDecl::new("city", TypeDecl::Primitive),
        ],
    )
}

#[test]
fn flattens_nested_fields_outermost_first() {
    let mut factory = TypeFactory::new();
    factory.declare(person()).unwrap();
    factory.declare(address()).unwrap();

    let schema = factory.schema("Person").unwrap();
    assert_eq!(schema.name(), Some("Person"));
    assert_eq!(
        schema.access_path_selectors_set(),
        chains(&[
            &["address", "city"],
            &["address", "street"],
            &["contact", "email"],
            &["contact", "phone"],
            &["name"],
        ])
    );
}

#[test]
fn named_schemas_resolve_to_one_shared_instance() {
    let mut factory = TypeFactory::new();
    factory.declare(person()).unwrap();
    factory.declare(address()).unwrap();
    let a = factory.schema("Address").unwrap();
    let b = factory.schema("Address").unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn empty_entity_field_is_a_leaf() {
    let mut factory = TypeFactory::new();
    factory
        .declare(SchemaDecl::named(
            "Holder",
            vec![FieldDecl::new("marker", TypeDecl::Schema(SchemaDecl::inline(vec![])))],
        ))
        .unwrap();
    let schema = factory.schema("Holder").unwrap();
    assert_eq!(schema.access_path_selectors_set(), chains(&[&["marker"]]));
}

#[test]
fn empty_schema_has_no_chains_but_its_type_is_a_leaf() {
    let mut factory = TypeFactory::new();
    factory.declare(SchemaDecl::named("Empty", vec![])).unwrap();
    assert!(factory.schema("Empty").unwrap().access_path_selectors_set().is_empty());
    let ty = factory.resolve(&TypeDecl::named("Empty")).unwrap();
    assert_eq!(ty.access_path_selectors_set(), AccessPathSelectorsSet::leaf());
}

#[test]
fn unknown_reference_is_rejected() {
    let mut factory = TypeFactory::new();
    factory.declare(person()).unwrap();
    assert_eq!(
        factory.schema("Person").unwrap_err(),
        IrError::UnknownType("Address".into())
    );
}

#[test]
fn cycles_are_rejected_at_construction() {
    let mut factory = TypeFactory::new();
    factory
        .declare(SchemaDecl::named(
            "Node",
            vec![FieldDecl::new("next", TypeDecl::named("Link"))],
        ))
        .unwrap();
    factory
        .declare(SchemaDecl::named(
            "Link",
            vec![FieldDecl::new("node", TypeDecl::named("Node"))],
        ))
        .unwrap();
    assert_eq!(
        factory.resolve_all().unwrap_err(),
        IrError::CyclicSchema {
            cycle: "Link -> Node -> Link".into()
        }
    );
}

#[test]
fn self_reference_is_a_cycle() {
    let mut factory = TypeFactory::new();
    factory
        .declare(SchemaDecl::named(
            "Tree",
            vec![FieldDecl::new("child", TypeDecl::named("Tree"))],
        ))
        .unwrap();
    assert!(matches!(
        factory.schema("Tree"),
        Err(IrError::CyclicSchema { .. })
    ));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut factory = TypeFactory::new();
    factory.declare(address()).unwrap();
    assert_eq!(
        factory.declare(address()).unwrap_err(),
        IrError::DuplicateSchema("Address".into())
    );
    assert_eq!(
        factory.declare(SchemaDecl::inline(vec![])).unwrap_err(),
        IrError::UnnamedSchema
    );

    let mut factory = TypeFactory::new();
    factory
        .declare(SchemaDecl::named(
            "Twice",
            vec![
                FieldDecl::new("a", TypeDecl::Primitive),
                FieldDecl::new("a", TypeDecl::Primitive),
            ],
        ))
        .unwrap();
    assert_eq!(
        factory.schema("Twice").unwrap_err(),
        IrError::DuplicateField {
            schema: "Twice".into(),
            field: "a".into()
        }
    );
}

#[test]
fn declarations_deserialize_from_json() {
    let decl: SchemaDecl = serde_json::from_str(
        r#"{
            "name": "Msg",
            "fields": [
                { "name": "body", "type": { "kind": "primitive" } },
                { "name": "meta", "type": { "kind": "schema", "fields": [
                    { "name": "sender", "type": { "kind": "primitive" } }
                ] } }
            ]
        }"#,
    )
    .unwrap();
    let mut factory = TypeFactory::new();
    factory.declare(decl).unwrap();
    assert_eq!(
        factory.schema("Msg").unwrap().access_path_selectors_set(),
        chains(&[&["body"], &["meta", "sender"]])
    );
}
