use thiserror::Error;

use crate::io::IoError;

/// Errors produced when a self-link cannot be split into instance identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelfLinkError {
    /// Link does not contain the projects/zones/instances path.
    #[error("self-link `{link}` does not match `.../projects/{{project}}/zones/{{zone}}/instances/{{name}}`")]
    Malformed { link: String },

    /// Link matched but ends with a slash.
    #[error("self-link `{link}` has a trailing slash")]
    TrailingSlash { link: String },

    /// Link matched but carries a query string or fragment.
    #[error("self-link `{link}` carries a query string or fragment")]
    QueryOrFragment { link: String },

    /// A project, zone, or name segment starts with `-`.
    #[error("self-link `{link}` has a segment starting with `-`")]
    LeadingDash { link: String },
}

/// Errors produced while loading or reading the key-value input source.
#[derive(Debug, Error)]
pub enum InputError {
    /// Inputs file could not be opened.
    #[error("failed to open inputs file `{path}`: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Inputs file could not be parsed.
    #[error("failed to read inputs file `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: IoError,
    },

    /// Inputs document is not a single object.
    #[error("inputs file `{path}` must contain exactly one object")]
    NotAnObject { path: String },

    /// `--input` override is not of the form `key=value`.
    #[error("invalid input override `{raw}`; expected `key=value`")]
    InvalidOverride { raw: String },

    /// Required input key is absent.
    #[error("required input `{key}` is missing")]
    Missing { key: String },

    /// Input value has an unexpected shape.
    #[error("input `{key}` must be {expected}")]
    InvalidType { key: String, expected: &'static str },
}

/// Errors produced by a collaborator probe (cloud inventory or host agent).
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Collaborator binary is not installed.
    #[error("`{tool}` is not available in PATH")]
    Unavailable { tool: String },

    /// Collaborator could not reach its target at all.
    #[error("`{tool}` could not reach {target}: {message}")]
    Unreachable {
        tool: String,
        target: String,
        message: String,
    },

    /// Collaborator process could not be spawned.
    #[error("failed to spawn `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Collaborator ran and reported a failure.
    #[error("`{tool}` execution failed: {message}")]
    Execution { tool: String, message: String },

    /// Collaborator output could not be decoded.
    #[error("failed to decode `{tool}` output: {message}")]
    Decode { tool: String, message: String },

    /// Local filesystem probe failed.
    #[error("failed to inspect `{path}`: {source}")]
    Filesystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Path would resolve outside the inspected root.
    #[error("path `{path}` escapes the inspected root")]
    OutsideRoot { path: String },
}

impl ProbeError {
    /// Fatal errors abort the whole run instead of failing one assertion.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Unreachable { .. })
    }
}
