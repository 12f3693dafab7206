use std::path::PathBuf;

use crate::cmd::{
    CommandError, CommandResponse, is_selected, load_inputs, respond, validate_selection,
};
use crate::domain::inputs::SELF_LINKS_KEY;
use crate::domain::report::ControlReport;
use crate::engine::ComputeInventory;
use crate::engine::vm::{STATUS_CONTROL, check_instances};

const PROFILE: &str = "vm";

/// Input arguments for vm command execution API.
#[derive(Debug, Clone, Default)]
pub struct VmCommandArgs {
    pub inputs: Option<PathBuf>,
    pub overrides: Vec<String>,
    pub controls: Vec<String>,
}

pub fn run(args: &VmCommandArgs, inventory: &dyn ComputeInventory) -> CommandResponse {
    respond(PROFILE, execute(args, inventory))
}

fn execute(
    args: &VmCommandArgs,
    inventory: &dyn ComputeInventory,
) -> Result<Vec<ControlReport>, CommandError> {
    validate_selection(&args.controls, &[STATUS_CONTROL.id])?;
    let inputs = load_inputs(args.inputs.as_deref(), &args.overrides)?;

    let mut controls = Vec::with_capacity(1);
    if is_selected(&args.controls, STATUS_CONTROL.id) {
        let self_links = inputs.string_list(SELF_LINKS_KEY)?;
        controls.push(check_instances(&self_links, inventory)?);
    }
    Ok(controls)
}

/// Ordered pipeline-step names used for `--emit-pipeline` diagnostics.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "vm_load_inputs".to_string(),
        "vm_parse_self_links".to_string(),
        "vm_describe_instances".to_string(),
        "vm_assert_running".to_string(),
    ]
}

/// Evaluation guards applied by the `vm` command.
pub fn guards() -> Vec<String> {
    vec![
        "read_only_inventory_queries".to_string(),
        "input_order_evaluation".to_string(),
        "no_shell_interpolation_for_user_input".to_string(),
    ]
}
