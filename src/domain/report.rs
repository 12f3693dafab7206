use serde::{Deserialize, Serialize};

/// Outcome of one assertion or one control.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

/// Single evaluated expectation against one subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    pub subject: String,
    pub expectation: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AssertionResult {
    pub fn passed(subject: impl Into<String>, expectation: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            expectation: expectation.into(),
            status: CheckStatus::Passed,
            message: None,
        }
    }

    pub fn failed(
        subject: impl Into<String>,
        expectation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            expectation: expectation.into(),
            status: CheckStatus::Failed,
            message: Some(message.into()),
        }
    }

    pub fn from_outcome(
        subject: impl Into<String>,
        expectation: impl Into<String>,
        outcome: Result<(), String>,
    ) -> Self {
        match outcome {
            Ok(()) => Self::passed(subject, expectation),
            Err(message) => Self::failed(subject, expectation, message),
        }
    }
}

/// Static identity of a control: id, title, and impact weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub impact: f64,
}

/// Evaluated control with its assertions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlReport {
    pub id: String,
    pub title: String,
    pub impact: f64,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_message: Option<String>,
    pub results: Vec<AssertionResult>,
}

impl ControlReport {
    /// A control fails if any assertion fails; with no assertions it is
    /// skipped, otherwise it passes.
    pub fn evaluated(spec: &ControlSpec, results: Vec<AssertionResult>) -> Self {
        let status = if results
            .iter()
            .any(|result| result.status == CheckStatus::Failed)
        {
            CheckStatus::Failed
        } else if results
            .iter()
            .all(|result| result.status == CheckStatus::Skipped)
        {
            CheckStatus::Skipped
        } else {
            CheckStatus::Passed
        };
        Self {
            id: spec.id.to_string(),
            title: spec.title.to_string(),
            impact: spec.impact,
            status,
            skip_message: None,
            results,
        }
    }

    /// A not-applicable control: no assertions are emitted.
    pub fn skipped(spec: &ControlSpec, message: impl Into<String>) -> Self {
        Self {
            id: spec.id.to_string(),
            title: spec.title.to_string(),
            impact: spec.impact,
            status: CheckStatus::Skipped,
            skip_message: Some(message.into()),
            results: Vec::new(),
        }
    }
}

/// Control counts by status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Report emitted by the `vm` and `remote` commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckReport {
    pub profile: String,
    pub matched: bool,
    pub summary: CheckSummary,
    pub controls: Vec<ControlReport>,
}

impl CheckReport {
    pub fn new(profile: impl Into<String>, controls: Vec<ControlReport>) -> Self {
        let mut summary = CheckSummary::default();
        for control in &controls {
            match control.status {
                CheckStatus::Passed => summary.passed += 1,
                CheckStatus::Failed => summary.failed += 1,
                CheckStatus::Skipped => summary.skipped += 1,
            }
        }
        Self {
            profile: profile.into(),
            matched: summary.failed == 0,
            summary,
            controls,
        }
    }
}

/// Diagnostics report emitted when `--emit-pipeline` is enabled.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineReport {
    pub command: String,
    pub input: PipelineInput,
    pub steps: Vec<String>,
    pub external_tools: Vec<ExternalToolUsage>,
    pub guards: Vec<String>,
}

impl PipelineReport {
    pub fn new(
        command: impl Into<String>,
        input: PipelineInput,
        steps: Vec<String>,
        guards: Vec<String>,
    ) -> Self {
        Self {
            command: command.into(),
            input,
            steps,
            external_tools: ExternalToolUsage::default_set(),
            guards,
        }
    }

    pub fn mark_external_tool_used(mut self, tool_name: &str) -> Self {
        if let Some(tool) = self
            .external_tools
            .iter_mut()
            .find(|tool| tool.name == tool_name)
        {
            tool.used = true;
        }
        self
    }
}

/// Input-source descriptors used in pipeline diagnostics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineInput {
    pub sources: Vec<PipelineInputSource>,
}

impl PipelineInput {
    pub fn new(sources: Vec<PipelineInputSource>) -> Self {
        Self { sources }
    }
}

/// Single input source descriptor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineInputSource {
    pub label: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl PipelineInputSource {
    pub fn path(label: impl Into<String>, path: impl Into<String>, format: Option<&str>) -> Self {
        Self {
            label: label.into(),
            source: "path".to_string(),
            path: Some(path.into()),
            format: format.map(ToOwned::to_owned),
        }
    }

    pub fn argument(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: "argument".to_string(),
            path: None,
            format: None,
        }
    }
}

/// External-tool usage summary in a deterministic order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExternalToolUsage {
    pub name: String,
    pub used: bool,
}

impl ExternalToolUsage {
    pub fn default_set() -> Vec<Self> {
        vec![
            Self {
                name: "gcloud".to_string(),
                used: false,
            },
            Self {
                name: "ssh".to_string(),
                used: false,
            },
        ]
    }
}
