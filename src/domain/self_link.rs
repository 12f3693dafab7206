use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::SelfLinkError;

/// Human-readable shape shown when a self-link does not match.
pub const SELF_LINK_SHAPE: &str = ".../projects/{project}/zones/{zone}/instances/{name}";

static SELF_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/projects/(?<project>[^/]+)/zones/(?<zone>[^/]+)/instances/(?<name>.+)$")
        .expect("self-link pattern compiles")
});

/// Identifiers of one compute instance extracted from its self-link URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfLink {
    pub project: String,
    pub zone: String,
    pub name: String,
}

impl SelfLink {
    /// Extracts `(project, zone, name)`. The name is greedy to the end of the
    /// link, but a trailing slash, query string, or fragment rejects the link
    /// instead of being folded into the name. Segments are passed to `gcloud`
    /// as arguments, so none may start with `-`.
    pub fn parse(link: &str) -> Result<Self, SelfLinkError> {
        let captures = SELF_LINK_PATTERN
            .captures(link)
            .ok_or_else(|| SelfLinkError::Malformed {
                link: link.to_string(),
            })?;

        let name = &captures["name"];
        if name.ends_with('/') {
            return Err(SelfLinkError::TrailingSlash {
                link: link.to_string(),
            });
        }
        if name.contains(['?', '#']) {
            return Err(SelfLinkError::QueryOrFragment {
                link: link.to_string(),
            });
        }

        let project = &captures["project"];
        let zone = &captures["zone"];
        if [project, zone, name]
            .iter()
            .any(|segment| segment.starts_with('-'))
        {
            return Err(SelfLinkError::LeadingDash {
                link: link.to_string(),
            });
        }

        Ok(Self {
            project: project.to_string(),
            zone: zone.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for SelfLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/zones/{}/instances/{}",
            self.project, self.zone, self.name
        )
    }
}
