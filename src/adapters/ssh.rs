use std::path::PathBuf;
use std::process::{Command, Output};

use crate::adapters::{run_captured, stderr_text};
use crate::domain::error::ProbeError;
use crate::domain::os_release::{OS_RELEASE_PATH, parse_os_name};
use crate::domain::target::SshTarget;
use crate::engine::HostInspector;

/// Environment variable overriding the `ssh` binary.
pub const SSH_BIN_ENV: &str = "INFRACHECK_SSH_BIN";

const TOOL: &str = "ssh";
/// Exit status `ssh` uses for its own connection failures.
const SSH_CONNECTION_FAILURE: i32 = 255;

/// Host inspector that runs read-only commands over `ssh`.
#[derive(Debug, Clone)]
pub struct SshHost {
    bin: String,
    target: SshTarget,
    identity: Option<PathBuf>,
}

impl SshHost {
    pub fn new(target: SshTarget) -> Self {
        Self {
            bin: std::env::var(SSH_BIN_ENV).unwrap_or_else(|_| TOOL.to_string()),
            target,
            identity: None,
        }
    }

    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    pub fn with_identity(mut self, identity: PathBuf) -> Self {
        self.identity = Some(identity);
        self
    }

    fn remote(&self, remote_command: &str) -> Result<Output, ProbeError> {
        let mut command = Command::new(&self.bin);
        command.args(["-o", "BatchMode=yes"]);
        if let Some(port) = self.target.port {
            command.arg("-p").arg(port.to_string());
        }
        if let Some(identity) = &self.identity {
            command.arg("-i").arg(identity);
        }
        command
            .arg(self.target.destination())
            .arg("--")
            .arg(remote_command);

        tracing::debug!(host = %self.target.destination(), remote_command, "running remote probe");
        let output = run_captured(&mut command, TOOL)?;
        if output.status.code() == Some(SSH_CONNECTION_FAILURE) {
            return Err(ProbeError::Unreachable {
                tool: TOOL.to_string(),
                target: self.target.destination(),
                message: stderr_text(&output),
            });
        }
        Ok(output)
    }
}

impl HostInspector for SshHost {
    fn os_name(&self) -> Result<String, ProbeError> {
        let output = self.remote(&format!("cat {OS_RELEASE_PATH}"))?;
        if !output.status.success() {
            return Err(ProbeError::Execution {
                tool: TOOL.to_string(),
                message: stderr_text(&output),
            });
        }
        let content = String::from_utf8_lossy(&output.stdout);
        parse_os_name(&content).ok_or_else(|| ProbeError::Decode {
            tool: TOOL.to_string(),
            message: format!("{OS_RELEASE_PATH} has no ID field"),
        })
    }

    fn file_exists(&self, path: &str) -> Result<bool, ProbeError> {
        let output = self.remote(&format!("test -e {}", shell_quote(path)))?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(ProbeError::Execution {
                tool: TOOL.to_string(),
                message: stderr_text(&output),
            }),
        }
    }
}

/// Quotes one argument for the remote POSIX shell.
fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}
