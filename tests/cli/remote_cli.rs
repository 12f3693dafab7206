use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

fn host_root(os_id: &str) -> TempDir {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("etc")).expect("mkdir etc");
    fs::write(
        dir.path().join("etc/os-release"),
        format!("NAME=\"Test Linux\"\nID={os_id}\nVERSION_ID=\"22.04\"\n"),
    )
    .expect("write os-release");
    fs::write(dir.path().join("etc/hosts"), "127.0.0.1 localhost\n").expect("write hosts");
    dir
}

fn run_remote(root: &Path, args: &[&str]) -> std::process::Output {
    let target = format!("local://{}", root.display());
    assert_cmd::cargo::cargo_bin_cmd!("infracheck")
        .env_remove("INFRACHECK_LOG")
        .args(["remote", "--target", target.as_str()])
        .args(args)
        .output()
        .expect("run remote")
}

#[test]
fn empty_verify_files_skips_file_control() {
    let root = host_root("ubuntu");
    let output = run_remote(root.path(), &["--input", "input_verify_files=\"[]\""]);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(report["controls"][0]["id"], json!("os-name"));
    assert_eq!(report["controls"][0]["impact"], json!(0.8));
    assert_eq!(report["controls"][0]["status"], json!("passed"));

    let files = &report["controls"][1];
    assert_eq!(files["id"], json!("test-file"));
    assert_eq!(files["impact"], json!(0.5));
    assert_eq!(files["status"], json!("skipped"));
    assert_eq!(files["results"], json!([]));
    assert!(files["skip_message"].is_string());
    assert_eq!(report["summary"], json!({"passed": 1, "failed": 0, "skipped": 1}));
}

#[test]
fn existing_file_from_inputs_file_passes() {
    let root = host_root("ubuntu");
    let inputs = root.path().join("inputs.json");
    fs::write(&inputs, r#"{"input_verify_files": "[\"/etc/hosts\"]"}"#).expect("write inputs");

    let output = run_remote(
        root.path(),
        &["--inputs", inputs.to_str().expect("utf8 path")],
    );

    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    let files = &report["controls"][1];
    assert_eq!(files["status"], json!("passed"));
    assert_eq!(files["results"][0]["subject"], json!("file /etc/hosts"));
}

#[test]
fn missing_file_fails_without_hiding_present_ones() {
    let root = host_root("ubuntu");
    let inputs = root.path().join("inputs.toml");
    fs::write(
        &inputs,
        "input_verify_files = [\"/opt/app/ready\", \"/etc/hosts\"]\n",
    )
    .expect("write inputs");

    let output = run_remote(
        root.path(),
        &["--inputs", inputs.to_str().expect("utf8 path")],
    );

    assert_eq!(output.status.code(), Some(2));
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    let results = report["controls"][1]["results"].as_array().expect("results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["status"], json!("failed"));
    assert_eq!(results[0]["message"], json!("file does not exist"));
    assert_eq!(results[1]["status"], json!("passed"));
}

#[test]
fn other_operating_system_fails_os_control() {
    let root = host_root("debian");
    let output = run_remote(root.path(), &["--control", "os-name"]);

    assert_eq!(output.status.code(), Some(2));
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    let controls = report["controls"].as_array().expect("controls");
    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0]["status"], json!("failed"));
    assert!(
        controls[0]["results"][0]["message"]
            .as_str()
            .expect("message")
            .contains("debian")
    );
}

#[test]
fn unknown_control_is_input_usage_error() {
    let root = host_root("ubuntu");
    let output = run_remote(root.path(), &["--control", "status"]);

    assert_eq!(output.status.code(), Some(3));
    let stderr_json: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(stderr_json["error"], json!("input_usage_error"));
}

#[test]
fn unsupported_target_is_input_usage_error() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("infracheck")
        .args(["remote", "--target", "winrm://host"])
        .output()
        .expect("run remote");

    assert_eq!(output.status.code(), Some(3));
    let stderr_json: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(stderr_json["error"], json!("input_usage_error"));
    assert_eq!(stderr_json["details"]["target"], json!("winrm://host"));
}

#[test]
fn unreachable_ssh_host_aborts_with_exit_three() {
    let dir = tempdir().expect("tempdir");
    let script = dir.path().join("ssh");
    write_exec_script(
        &script,
        "#!/bin/sh\necho 'ssh: connect to host vm1 port 22: Connection refused' 1>&2\nexit 255\n",
    );

    let output = assert_cmd::cargo::cargo_bin_cmd!("infracheck")
        .env("INFRACHECK_SSH_BIN", &script)
        .env_remove("INFRACHECK_LOG")
        .args(["remote", "--target", "ssh://admin@vm1"])
        .output()
        .expect("run remote");

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let stderr_json: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(stderr_json["error"], json!("collaborator_unavailable"));
    assert_eq!(stderr_json["code"], json!(3));
    assert_eq!(stderr_json["details"]["command"], json!("remote"));
    assert!(
        stderr_json["message"]
            .as_str()
            .expect("message")
            .contains("Connection refused")
    );
}

#[test]
fn ssh_target_runs_probes_remotely() {
    let dir = tempdir().expect("tempdir");
    let script = dir.path().join("ssh");
    write_exec_script(
        &script,
        "#!/bin/sh\n[ \"$3\" = \"admin@vm1\" ] || exit 9\ncase \"$5\" in\n  'cat /etc/os-release') printf 'NAME=\"Ubuntu\"\\nID=ubuntu\\n' ;;\n  \"test -e '/etc/hosts'\") exit 0 ;;\n  *) exit 1 ;;\nesac\n",
    );

    let output = assert_cmd::cargo::cargo_bin_cmd!("infracheck")
        .env("INFRACHECK_SSH_BIN", &script)
        .env_remove("INFRACHECK_LOG")
        .args([
            "remote",
            "--target",
            "ssh://admin@vm1",
            "--input",
            "input_verify_files=[\"/etc/hosts\"]",
        ])
        .output()
        .expect("run remote");

    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(report["matched"], json!(true));
    assert_eq!(report["summary"]["passed"], json!(2));
}

#[test]
fn emit_pipeline_marks_ssh_used_for_ssh_targets() {
    let dir = tempdir().expect("tempdir");
    let script = dir.path().join("ssh");
    write_exec_script(
        &script,
        "#!/bin/sh\ncase \"$5\" in\n  'cat /etc/os-release') echo 'ID=ubuntu' ;;\n  *) exit 1 ;;\nesac\n",
    );

    let output = assert_cmd::cargo::cargo_bin_cmd!("infracheck")
        .env("INFRACHECK_SSH_BIN", &script)
        .env_remove("INFRACHECK_LOG")
        .args([
            "--emit-pipeline",
            "remote",
            "--target",
            "ssh://admin@vm1",
            "--control",
            "os-name",
        ])
        .output()
        .expect("run remote");

    assert_eq!(output.status.code(), Some(0));
    let pipeline: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(pipeline["command"], json!("remote"));
    assert_eq!(pipeline["input"]["sources"][0]["label"], json!("target"));
    assert_eq!(pipeline["input"]["sources"][0]["source"], json!("argument"));
    assert_eq!(pipeline["external_tools"][0]["name"], json!("gcloud"));
    assert_eq!(pipeline["external_tools"][0]["used"], json!(false));
    assert_eq!(pipeline["external_tools"][1]["name"], json!("ssh"));
    assert_eq!(pipeline["external_tools"][1]["used"], json!(true));
}

#[test]
fn emit_pipeline_leaves_ssh_unused_for_local_targets() {
    let root = host_root("ubuntu");
    let target = format!("local://{}", root.path().display());
    let output = assert_cmd::cargo::cargo_bin_cmd!("infracheck")
        .env_remove("INFRACHECK_LOG")
        .args(["--emit-pipeline", "remote", "--target", target.as_str()])
        .output()
        .expect("run remote");

    assert_eq!(output.status.code(), Some(0));
    let pipeline: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(pipeline["external_tools"][1]["used"], json!(false));
}

#[test]
fn os_name_only_run_ignores_malformed_verify_files() {
    let root = host_root("ubuntu");
    let output = run_remote(
        root.path(),
        &["--control", "os-name", "--input", "input_verify_files=42"],
    );

    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(report["controls"][0]["id"], json!("os-name"));
}

fn write_exec_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(path).expect("metadata").permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(path, permissions).expect("chmod");
    }
}
