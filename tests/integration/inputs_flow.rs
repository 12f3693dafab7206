use std::fs;

use infracheck::cmd::load_inputs;
use infracheck::domain::error::InputError;
use infracheck::domain::inputs::{SELF_LINKS_KEY, parse_list_literal};
use tempfile::tempdir;

#[test]
fn yaml_json_and_toml_inputs_agree() {
    let dir = tempdir().expect("tempdir");
    let yaml = dir.path().join("inputs.yaml");
    let json = dir.path().join("inputs.json");
    let toml = dir.path().join("inputs.toml");
    fs::write(
        &yaml,
        "output_self_links:\n  - /projects/p1/zones/z1/instances/vm1\ninput_verify_files: '[\"/tmp/a.txt\", \"/tmp/b.txt\"]'\n",
    )
    .expect("write yaml");
    fs::write(
        &json,
        r#"{"output_self_links": ["/projects/p1/zones/z1/instances/vm1"], "input_verify_files": "[\"/tmp/a.txt\", \"/tmp/b.txt\"]"}"#,
    )
    .expect("write json");
    fs::write(
        &toml,
        "output_self_links = [\"/projects/p1/zones/z1/instances/vm1\"]\ninput_verify_files = '[\"/tmp/a.txt\", \"/tmp/b.txt\"]'\n",
    )
    .expect("write toml");

    for path in [&yaml, &json, &toml] {
        let inputs = load_inputs(Some(path.as_path()), &[]).expect("load inputs");
        assert_eq!(
            inputs.string_list(SELF_LINKS_KEY).expect("links"),
            vec!["/projects/p1/zones/z1/instances/vm1"]
        );
        assert_eq!(
            inputs.verify_files().expect("files"),
            vec!["/tmp/a.txt", "/tmp/b.txt"]
        );
    }
}

#[test]
fn overrides_replace_file_values() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("inputs.yml");
    fs::write(&path, "input_verify_files: '[\"/tmp/a.txt\"]'\n").expect("write yaml");

    let inputs = load_inputs(Some(path.as_path()), &["input_verify_files=[]".to_string()])
        .expect("load inputs");
    assert!(inputs.verify_files().expect("files").is_empty());
}

#[test]
fn list_document_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("inputs.json");
    fs::write(&path, r#"[{"a": 1}, {"b": 2}]"#).expect("write json");

    let err = load_inputs(Some(path.as_path()), &[]).expect_err("must fail");
    assert!(matches!(err, InputError::NotAnObject { .. }));
}

#[test]
fn unreadable_inputs_file_is_reported() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.yml");

    let err = load_inputs(Some(path.as_path()), &[]).expect_err("must fail");
    assert!(matches!(err, InputError::OpenFile { .. }));
    assert!(err.to_string().contains("absent.yml"));
}

#[test]
fn list_literal_parsing_matches_serialized_form() {
    assert!(parse_list_literal("[]").is_empty());
    assert_eq!(parse_list_literal(r#"["/etc/hosts"]"#), vec!["/etc/hosts"]);
    assert_eq!(
        parse_list_literal("[/var/log/a.log,/var/log/b.log]"),
        vec!["/var/log/a.log", "/var/log/b.log"]
    );
}
