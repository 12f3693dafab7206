pub mod gcloud;
pub mod local;
pub mod ssh;

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::domain::error::ProbeError;
use crate::domain::target::HostTarget;
use crate::engine::HostInspector;

/// Builds the host inspector for a parsed `--target`.
pub fn host_inspector(target: &HostTarget, identity: Option<&Path>) -> Box<dyn HostInspector> {
    tracing::debug!(host = %target, "selecting host inspector");
    match target {
        HostTarget::Local { root } => Box::new(local::LocalHost::new(root.clone())),
        HostTarget::Ssh(ssh_target) => {
            let mut host = ssh::SshHost::new(ssh_target.clone());
            if let Some(identity) = identity {
                host = host.with_identity(identity.to_path_buf());
            }
            Box::new(host)
        }
    }
}

/// Runs a collaborator with null stdin and captured output.
pub(crate) fn run_captured(command: &mut Command, tool: &str) -> Result<Output, ProbeError> {
    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    match child {
        Ok(child) => child.wait_with_output().map_err(|source| ProbeError::Spawn {
            tool: tool.to_string(),
            source,
        }),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Err(ProbeError::Unavailable {
                tool: tool.to_string(),
            })
        }
        Err(source) => Err(ProbeError::Spawn {
            tool: tool.to_string(),
            source,
        }),
    }
}

pub(crate) fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
