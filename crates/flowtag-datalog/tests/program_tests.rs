// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use std::sync::Arc;

use flowtag_datalog::{DatalogProgram, Manifest, ManifestError};
use flowtag_ir::{
    AccessPath, AccessPathRoot, AccessPathSelectors, DatalogPrintContext, IrError, Predicate,
    TagCheck,
};

const CONTACTS: &str = include_str!("testdata/contacts.json");

const CONTACTS_PROGRAM: &str = r#"#include "policy/taint.dl"

// Claims
claimHasTag("Source", "R.Source.out.name", "public").

// Ownership
ownsAccessPath("alice", "R.Sink.in.address.city").
ownsAccessPath("alice", "R.Sink.in.name").

// Edges
edge("R.Source.out.address.city", "R.Sink.in.address.city").
edge("R.Source.out.name", "R.Sink.in.name").

// Checks
isCheck("check_num_0", "Sink.in.name"). check("check_num_0", owner, "Sink.in.name") :- ownsAccessPath(owner, "Sink.in.name"), mustHaveTag("Sink.in.name", owner, "public").
isCheck("check_num_1", "R.Sink.in.name"). check("check_num_1", owner, "R.Sink.in.name") :- ownsAccessPath(owner, "R.Sink.in.name"), mustHaveTag("R.Sink.in.name", owner, "public").
isCheck("check_num_2", "Sink.in.address.city"). check("check_num_2", owner, "Sink.in.address.city") :- ownsAccessPath(owner, "Sink.in.address.city"), !mustHaveTag("Sink.in.address.city", owner, "secret").

"#;

#[test]
fn contacts_manifest_renders_golden_program() {
    let program = Manifest::from_json(CONTACTS).unwrap().into_program().unwrap();
    assert_eq!(program.render(), CONTACTS_PROGRAM);
}

#[test]
fn instantiated_checks_share_the_declared_predicate() {
    let program = Manifest::from_json(CONTACTS).unwrap().into_program().unwrap();
    let checks = program.checks();
    assert_eq!(checks.len(), 3);
    assert!(Arc::ptr_eq(checks[0].predicate(), checks[1].predicate()));
    assert!(!Arc::ptr_eq(checks[0].predicate(), checks[2].predicate()));
    assert!(!checks[0].access_path().root().is_instantiated());
    assert!(checks[1].access_path().root().is_instantiated());
}

#[test]
fn selectors_of_lists_leaf_chains_in_order() {
    let manifest = Manifest::from_json(CONTACTS).unwrap();
    let chains: Vec<String> = manifest
        .selectors_of("Contact")
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(chains, ["address.city", "name"]);
}

#[test]
fn negated_composite_emits_namespaced_helper_relation() {
    let path = AccessPath::new(
        AccessPathRoot::handle_connection("R", "P", "in"),
        AccessPathSelectors::from_fields(["f"]),
    );
    let predicate = Predicate::not(Predicate::or(
        Predicate::tag_presence("a"),
        Predicate::tag_presence("b"),
    ));
    let mut program = DatalogProgram::new();
    program.add_check(TagCheck::new(path, Arc::new(predicate)));

    let ctxt = DatalogPrintContext::with_namespace("w0").unwrap();
    let expected = concat!(
        "// Checks\n",
        r#"isCheck("w0_check_num_0", "R.P.in.f"). check("w0_check_num_0", owner, "R.P.in.f") :- ownsAccessPath(owner, "R.P.in.f"), !w0_notHelper0(owner)."#,
        "\n\n",
        "// Helper relations\n",
        ".decl w0_notHelper0(owner: symbol)\n",
        r#"w0_notHelper0(owner) :- ownsAccessPath(owner, "R.P.in.f"), ((mustHaveTag("R.P.in.f", owner, "a")); (mustHaveTag("R.P.in.f", owner, "b")))."#,
        "\n\n",
    );
    assert_eq!(program.render_with(ctxt), expected);
}

#[test]
fn unknown_predicate_is_rejected() {
    let json = r#"{
        "checks": [{
            "access_path": { "root": { "kind": "handle_connection_spec", "particle_spec": "P", "handle_spec": "h" } },
            "predicate": "nope"
        }]
    }"#;
    let err = Manifest::from_json(json).unwrap().into_program().unwrap_err();
    assert!(matches!(err, ManifestError::UnknownPredicate(name) if name == "nope"));
}

#[test]
fn unknown_schema_is_rejected() {
    let json = r#"{
        "handles": [{
            "owner": "alice",
            "schema": "Missing",
            "root": { "kind": "handle_connection", "recipe": "R", "particle": "P", "handle": "h" }
        }]
    }"#;
    let err = Manifest::from_json(json).unwrap().into_program().unwrap_err();
    assert!(matches!(err, ManifestError::UnknownSchema(name) if name == "Missing"));
}

#[test]
fn instantiating_onto_a_spec_root_is_rejected() {
    let json = r#"{
        "predicates": { "t": { "op": "tag_presence", "tag": "t" } },
        "checks": [{
            "access_path": { "root": { "kind": "handle_connection", "recipe": "R", "particle": "P", "handle": "h" } },
            "predicate": "t",
            "instantiate_as": [{ "kind": "handle_connection", "recipe": "R", "particle": "P", "handle": "h" }]
        }]
    }"#;
    let err = Manifest::from_json(json).unwrap().into_program().unwrap_err();
    assert!(matches!(err, ManifestError::Ir(IrError::AlreadyInstantiated(_))));
}

#[test]
fn spec_path_spelling_a_concrete_path_is_rejected() {
    let json = r#"{
        "predicates": { "t": { "op": "tag_presence", "tag": "t" } },
        "edges": [{
            "source": { "root": { "kind": "handle_connection", "recipe": "R", "particle": "Q", "handle": "h" } },
            "target": { "root": { "kind": "handle_connection", "recipe": "R", "particle": "P", "handle": "h" } }
        }],
        "checks": [{
            "access_path": {
                "root": { "kind": "handle_connection_spec", "particle_spec": "R", "handle_spec": "P" },
                "selectors": [{ "field": "h" }]
            },
            "predicate": "t"
        }]
    }"#;
    let err = Manifest::from_json(json).unwrap().into_program().unwrap_err();
    let ManifestError::AmbiguousAccessPath(ambiguous) = err else {
        panic!("expected an ambiguous access path, got {err:?}");
    };
    assert_eq!(ambiguous.term, "R.P.h");
    assert_eq!(
        ambiguous.first.root(),
        &AccessPathRoot::handle_connection("R", "P", "h")
    );
    assert_eq!(
        ambiguous.second.root(),
        &AccessPathRoot::handle_connection_spec("R", "P")
    );
}

#[test]
fn quoted_identifiers_are_rejected() {
    let json = r#"{
        "edges": [{
            "source": { "root": { "kind": "handle_connection", "recipe": "R", "particle": "P\"", "handle": "h" } },
            "target": { "root": { "kind": "handle_connection", "recipe": "R", "particle": "Q", "handle": "h" } }
        }]
    }"#;
    let err = Manifest::from_json(json).unwrap().into_program().unwrap_err();
    assert!(matches!(err, ManifestError::Ir(IrError::InvalidIdentifier { .. })));
}

#[test]
fn unknown_manifest_keys_are_rejected() {
    assert!(matches!(
        Manifest::from_json(r#"{ "edgez": [] }"#),
        Err(ManifestError::Json(_))
    ));
}
