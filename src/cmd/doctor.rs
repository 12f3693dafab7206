use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use serde_json::json;

#[cfg(windows)]
use std::ffi::OsString;

use crate::adapters::gcloud::GCLOUD_BIN_ENV;
use crate::adapters::ssh::SSH_BIN_ENV;
use crate::cmd::CommandResponse;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct DoctorToolReport {
    name: String,
    found: bool,
    version: Option<String>,
    executable: bool,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ToolSpec {
    name: &'static str,
    bin_env: &'static str,
    version_arg: &'static str,
    install_hint: &'static str,
}

const TOOL_SPECS: [ToolSpec; 2] = [
    ToolSpec {
        name: "gcloud",
        bin_env: GCLOUD_BIN_ENV,
        version_arg: "--version",
        install_hint: "Install the Google Cloud CLI and ensure `gcloud` is available in PATH.",
    },
    ToolSpec {
        name: "ssh",
        bin_env: SSH_BIN_ENV,
        version_arg: "-V",
        install_hint: "Install an OpenSSH client and ensure `ssh` is available in PATH.",
    },
];

/// Probes every collaborator binary; exit code 3 when any is unusable.
pub fn run() -> CommandResponse {
    let reports: Vec<DoctorToolReport> = TOOL_SPECS.iter().map(diagnose_tool).collect();
    let all_executable = reports.iter().all(|report| report.executable);

    CommandResponse {
        exit_code: if all_executable { 0 } else { 3 },
        payload: json!({
            "tools": reports,
        }),
    }
}

/// Ordered pipeline-step names used for `--emit-pipeline` diagnostics.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "doctor_probe_gcloud".to_string(),
        "doctor_probe_ssh".to_string(),
    ]
}

/// Evaluation guards applied by the `doctor` command.
pub fn guards() -> Vec<String> {
    vec![
        "fixed_tool_probe_order_gcloud_ssh".to_string(),
        "no_shell_interpolation_for_user_input".to_string(),
    ]
}

fn diagnose_tool(spec: &ToolSpec) -> DoctorToolReport {
    let bin = env::var(spec.bin_env).unwrap_or_else(|_| spec.name.to_string());
    let found = if Path::new(&bin).components().count() > 1 {
        Path::new(&bin).is_file()
    } else {
        find_in_path(OsStr::new(&bin)).is_some()
    };
    if !found {
        return DoctorToolReport {
            name: spec.name.to_string(),
            found: false,
            version: None,
            executable: false,
            message: format!("`{bin}` was not found in PATH. {}", spec.install_hint),
        };
    }

    match Command::new(&bin).arg(spec.version_arg).output() {
        Ok(output) => {
            let version = capture_version(&output.stdout, &output.stderr);
            if output.status.success() {
                DoctorToolReport {
                    name: spec.name.to_string(),
                    found: true,
                    version,
                    executable: true,
                    message: "ok".to_string(),
                }
            } else {
                DoctorToolReport {
                    name: spec.name.to_string(),
                    found: true,
                    version,
                    executable: false,
                    message: format!(
                        "`{bin} {}` returned non-zero status ({}). Reinstall or repair the tool. {}",
                        spec.version_arg,
                        status_label(output.status.code()),
                        spec.install_hint,
                    ),
                }
            }
        }
        Err(error) => DoctorToolReport {
            name: spec.name.to_string(),
            found: true,
            version: None,
            executable: false,
            message: match error.kind() {
                std::io::ErrorKind::PermissionDenied => format!(
                    "`{bin}` exists but is not executable. Fix file permissions. {}",
                    spec.install_hint
                ),
                _ => format!(
                    "failed to execute `{bin}`: {error}. {}",
                    spec.install_hint
                ),
            },
        },
    }
}

fn capture_version(stdout: &[u8], stderr: &[u8]) -> Option<String> {
    let value = first_non_empty_line(stdout).or_else(|| first_non_empty_line(stderr));
    value.map(ToOwned::to_owned)
}

fn first_non_empty_line(bytes: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(bytes).ok()?;
    text.lines().find(|line| !line.trim().is_empty())
}

fn status_label(code: Option<i32>) -> String {
    code.map(|value| value.to_string())
        .unwrap_or_else(|| "terminated by signal".to_string())
}

fn find_in_path(tool: &OsStr) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .flat_map(|directory| candidate_paths(&directory, tool))
        .find(|candidate| candidate.is_file())
}

fn candidate_paths(directory: &Path, tool: &OsStr) -> Vec<PathBuf> {
    #[cfg(windows)]
    let mut candidates = vec![directory.join(tool)];
    #[cfg(not(windows))]
    let candidates = vec![directory.join(tool)];

    #[cfg(windows)]
    {
        if Path::new(tool).extension().is_none() {
            let pathext =
                env::var_os("PATHEXT").unwrap_or_else(|| OsString::from(".COM;.EXE;.BAT;.CMD"));
            for ext in env::split_paths(&pathext) {
                let ext_str = ext.to_string_lossy();
                if ext_str.is_empty() {
                    continue;
                }
                let mut name = OsString::from(tool);
                name.push(ext_str.as_ref());
                candidates.push(directory.join(name));
            }
        }
    }

    candidates
}
