use std::path::PathBuf;

use crate::cmd::{
    CommandError, CommandResponse, is_selected, load_inputs, respond, validate_selection,
};
use crate::domain::report::ControlReport;
use crate::engine::HostInspector;
use crate::engine::remote::{OS_NAME_CONTROL, TEST_FILE_CONTROL, check_files, check_os_name};

const PROFILE: &str = "remote";

/// Input arguments for remote command execution API.
#[derive(Debug, Clone, Default)]
pub struct RemoteCommandArgs {
    pub inputs: Option<PathBuf>,
    pub overrides: Vec<String>,
    pub controls: Vec<String>,
}

pub fn run(args: &RemoteCommandArgs, host: &dyn HostInspector) -> CommandResponse {
    respond(PROFILE, execute(args, host))
}

fn execute(
    args: &RemoteCommandArgs,
    host: &dyn HostInspector,
) -> Result<Vec<ControlReport>, CommandError> {
    validate_selection(&args.controls, &[OS_NAME_CONTROL.id, TEST_FILE_CONTROL.id])?;
    let inputs = load_inputs(args.inputs.as_deref(), &args.overrides)?;

    let mut controls = Vec::with_capacity(2);
    if is_selected(&args.controls, OS_NAME_CONTROL.id) {
        controls.push(check_os_name(host)?);
    }
    if is_selected(&args.controls, TEST_FILE_CONTROL.id) {
        let verify_files = inputs.verify_files()?;
        controls.push(check_files(&verify_files, host)?);
    }
    Ok(controls)
}

/// Ordered pipeline-step names used for `--emit-pipeline` diagnostics.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "remote_load_inputs".to_string(),
        "remote_parse_verify_files".to_string(),
        "remote_probe_os_name".to_string(),
        "remote_probe_files".to_string(),
    ]
}

/// Evaluation guards applied by the `remote` command.
pub fn guards() -> Vec<String> {
    vec![
        "read_only_host_probes".to_string(),
        "input_order_evaluation".to_string(),
        "single_quoted_remote_paths".to_string(),
    ]
}
