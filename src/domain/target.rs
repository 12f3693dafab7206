use std::fmt;
use std::path::PathBuf;

/// Host inspected by the `remote` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostTarget {
    /// Local filesystem, with absolute paths resolved under `root`.
    Local { root: PathBuf },
    /// Remote host reached through `ssh`.
    Ssh(SshTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
}

impl SshTarget {
    /// Destination argument passed to `ssh`.
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }
}

impl HostTarget {
    pub fn local() -> Self {
        Self::Local {
            root: PathBuf::from("/"),
        }
    }

    /// Parses `local`, `local://<root>`, or `ssh://[user@]host[:port]`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("target cannot be empty".to_string());
        }
        if raw == "local" {
            return Ok(Self::local());
        }
        if let Some(root) = raw.strip_prefix("local://") {
            if root.is_empty() {
                return Ok(Self::local());
            }
            return Ok(Self::Local {
                root: PathBuf::from(root),
            });
        }
        if let Some(rest) = raw.strip_prefix("ssh://") {
            return parse_ssh(rest).map(Self::Ssh);
        }
        Err(format!(
            "unsupported target `{raw}`; expected `local`, `local://<root>`, or `ssh://[user@]host[:port]`"
        ))
    }
}

fn parse_ssh(rest: &str) -> Result<SshTarget, String> {
    let rest = rest.trim_end_matches('/');
    let (user, host_port) = match rest.rsplit_once('@') {
        Some((user, host_port)) if !user.is_empty() => (Some(user.to_string()), host_port),
        Some(_) => return Err("ssh target has an empty user".to_string()),
        None => (None, rest),
    };
    let (host, port) = match host_port.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("invalid ssh port `{port}`"))?;
            (host, Some(port))
        }
        None => (host_port, None),
    };
    if host.is_empty() {
        return Err("ssh target has an empty host".to_string());
    }
    Ok(SshTarget {
        user,
        host: host.to_string(),
        port,
    })
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { root } => write!(f, "local://{}", root.display()),
            Self::Ssh(target) => {
                write!(f, "ssh://{}", target.destination())?;
                if let Some(port) = target.port {
                    write!(f, ":{port}")?;
                }
                Ok(())
            }
        }
    }
}
