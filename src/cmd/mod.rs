pub mod doctor;
pub mod remote;
pub mod vm;

use std::path::Path;

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::error::{InputError, ProbeError};
use crate::domain::inputs::Inputs;
use crate::domain::report::{CheckReport, ControlReport};

/// Structured command response that carries exit-code mapping and JSON payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommandResponse {
    pub exit_code: i32,
    pub payload: Value,
}

/// Loads the inputs file (when given) and applies `key=value` overrides on top.
pub fn load_inputs(path: Option<&Path>, overrides: &[String]) -> Result<Inputs, InputError> {
    let mut inputs = match path {
        Some(path) => Inputs::from_path(path)?,
        None => Inputs::new(),
    };
    for raw in overrides {
        inputs.apply_override(raw)?;
    }
    Ok(inputs)
}

pub(crate) enum CommandError {
    InputUsage(String),
    Unavailable(String),
}

impl From<InputError> for CommandError {
    fn from(error: InputError) -> Self {
        Self::InputUsage(error.to_string())
    }
}

impl From<ProbeError> for CommandError {
    fn from(error: ProbeError) -> Self {
        Self::Unavailable(error.to_string())
    }
}

/// Rejects `--control` ids that the command does not define.
pub(crate) fn validate_selection(
    selected: &[String],
    known: &[&'static str],
) -> Result<(), CommandError> {
    match selected
        .iter()
        .find(|id| !known.contains(&id.as_str()))
    {
        Some(unknown) => Err(CommandError::InputUsage(format!(
            "unknown control `{unknown}`; available controls: {}",
            known.join(", ")
        ))),
        None => Ok(()),
    }
}

pub(crate) fn is_selected(selected: &[String], id: &str) -> bool {
    selected.is_empty() || selected.iter().any(|candidate| candidate == id)
}

pub(crate) fn respond(
    profile: &str,
    controls: Result<Vec<ControlReport>, CommandError>,
) -> CommandResponse {
    match controls {
        Ok(controls) => report_response(CheckReport::new(profile, controls)),
        Err(CommandError::InputUsage(message)) => {
            error_response("input_usage_error", message, profile)
        }
        Err(CommandError::Unavailable(message)) => {
            error_response("collaborator_unavailable", message, profile)
        }
    }
}

fn error_response(error: &str, message: String, profile: &str) -> CommandResponse {
    CommandResponse {
        exit_code: 3,
        payload: json!({
            "error": error,
            "message": message,
            "code": 3,
            "details": {"command": profile},
        }),
    }
}

fn report_response(report: CheckReport) -> CommandResponse {
    let exit_code = if report.matched { 0 } else { 2 };
    tracing::info!(
        profile = %report.profile,
        passed = report.summary.passed,
        failed = report.summary.failed,
        skipped = report.summary.skipped,
        "check run finished"
    );
    match serde_json::to_value(&report) {
        Ok(payload) => CommandResponse { exit_code, payload },
        Err(_) => CommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "internal_error",
                "message": "failed to serialize check report",
                "code": 1,
                "details": {"command": report.profile},
            }),
        },
    }
}
