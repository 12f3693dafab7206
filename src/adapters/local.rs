use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::ProbeError;
use crate::domain::os_release::{OS_RELEASE_PATH, parse_os_name};
use crate::engine::HostInspector;

const TOOL: &str = "local";

/// Host inspector for the local filesystem. Absolute paths are resolved under
/// `root`, so a mounted image can be inspected as if it were `/`.
#[derive(Debug, Clone)]
pub struct LocalHost {
    root: PathBuf,
}

impl LocalHost {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Joins `path` under the root. `..` components are refused so a path
    /// cannot climb out of the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, ProbeError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(ProbeError::OutsideRoot {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl HostInspector for LocalHost {
    fn os_name(&self) -> Result<String, ProbeError> {
        let path = self.resolve(OS_RELEASE_PATH)?;
        let content = fs::read_to_string(&path).map_err(|source| ProbeError::Filesystem {
            path: path.display().to_string(),
            source,
        })?;
        parse_os_name(&content).ok_or_else(|| ProbeError::Decode {
            tool: TOOL.to_string(),
            message: format!("{} has no ID field", path.display()),
        })
    }

    fn file_exists(&self, path: &str) -> Result<bool, ProbeError> {
        let resolved = self.resolve(path)?;
        resolved.try_exists().map_err(|source| ProbeError::Filesystem {
            path: resolved.display().to_string(),
            source,
        })
    }
}
