// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Runs the `flowtag` binary end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn testdata() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../flowtag-datalog/tests/testdata")
}

/// Runs `flowtag` against an isolated config dir.
fn flowtag(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flowtag"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

/// A config dir whose toolchain runs the stand-in compiler through `sh`.
fn fake_toolchain(dir: &Path) {
    let toolchain = serde_json::json!({
        "authorization_compiler": "sh",
        "compiler_leading_args": [testdata().join("fake_authorization_compiler.sh")],
    });
    fs::write(dir.join("toolchain.json"), toolchain.to_string()).unwrap();
}

#[test]
fn emit_writes_the_program_to_stdout() {
    let config = tempfile::tempdir().unwrap();
    let manifest = testdata().join("contacts.json");
    let output = flowtag(config.path(), &["emit", manifest.to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("#include \"policy/taint.dl\"\n\n// Claims\n"));
    assert!(text.contains("edge(\"R.Source.out.name\", \"R.Sink.in.name\").\n"));
    assert!(text.contains("isCheck(\"check_num_2\", \"Sink.in.address.city\")."));
    assert!(!text.contains("check_num_3"));
}

#[test]
fn emit_namespace_and_output_file() {
    let config = tempfile::tempdir().unwrap();
    let out = config.path().join("program.dl");
    let manifest = testdata().join("contacts.json");
    let output = flowtag(
        config.path(),
        &[
            "emit",
            manifest.to_str().unwrap(),
            "--namespace",
            "w1",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("isCheck(\"w1_check_num_0\", \"Sink.in.name\")."));
    assert!(!text.contains("\"check_num_"));
}

#[test]
fn configured_includes_come_first() {
    let config = tempfile::tempdir().unwrap();
    fs::write(
        config.path().join("toolchain.json"),
        r#"{ "includes": ["rules/base.dl"] }"#,
    )
    .unwrap();
    let manifest = testdata().join("contacts.json");
    let output = flowtag(config.path(), &["emit", manifest.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("#include \"rules/base.dl\"\n#include \"policy/taint.dl\"\n\n"));
}

#[cfg(unix)]
#[test]
fn emit_includes_compiled_authorization_logic_only_on_success() {
    let config = tempfile::tempdir().unwrap();
    fake_toolchain(config.path());
    let work = tempfile::tempdir().unwrap();
    let out_dir = work.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let manifest = |module: &str| {
        serde_json::json!({
            "includes": ["policy/taint.dl"],
            "authorization_logic": {
                "module": module,
                "input_dir": testdata(),
                "output_dir": "out",
            },
        })
        .to_string()
    };

    let good = work.path().join("good.json");
    fs::write(&good, manifest("simple_auth_logic")).unwrap();
    let output = flowtag(config.path(), &["emit", good.to_str().unwrap()]);
    assert!(output.status.success());
    let compiled = out_dir.join("simple_auth_logic.dl");
    assert!(compiled.is_file());
    assert_eq!(
        stdout(&output),
        format!(
            "#include \"policy/taint.dl\"\n#include \"{}\"\n\n",
            compiled.display()
        )
    );

    let bad = work.path().join("bad.json");
    fs::write(&bad, manifest("absent")).unwrap();
    let output = flowtag(config.path(), &["emit", bad.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "#include \"policy/taint.dl\"\n\n");
}

#[test]
fn selectors_lists_leaf_chains() {
    let config = tempfile::tempdir().unwrap();
    let manifest = testdata().join("contacts.json");
    let output = flowtag(config.path(), &["selectors", manifest.to_str().unwrap(), "Contact"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "address.city\nname\n");
}

#[test]
fn selectors_of_unknown_schema_fails() {
    let config = tempfile::tempdir().unwrap();
    let manifest = testdata().join("contacts.json");
    let output = flowtag(config.path(), &["selectors", manifest.to_str().unwrap(), "Nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown schema `Nope`"));
}

#[cfg(unix)]
#[test]
fn authz_exit_codes() {
    let config = tempfile::tempdir().unwrap();
    fake_toolchain(config.path());
    let out = tempfile::tempdir().unwrap();
    let input = testdata();

    let ok = flowtag(
        config.path(),
        &[
            "authz",
            "--module",
            "simple_auth_logic",
            "--input-dir",
            input.to_str().unwrap(),
            "--output-dir",
            out.path().to_str().unwrap(),
        ],
    );
    assert_eq!(ok.status.code(), Some(0));
    assert!(out.path().join("simple_auth_logic.dl").is_file());

    let failed = flowtag(
        config.path(),
        &["authz", "--module", "simple_auth_logic", "--input-dir", "blah", "--output-dir", "blah"],
    );
    assert_eq!(failed.status.code(), Some(1));
}
