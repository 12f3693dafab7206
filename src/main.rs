use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use infracheck::adapters::{self, gcloud::GcloudInventory};
use infracheck::cmd::{CommandResponse, doctor, remote, vm};
use infracheck::domain::report::{PipelineInput, PipelineInputSource, PipelineReport};
use infracheck::domain::target::HostTarget;
use infracheck::io as infracheck_io;
use infracheck::logging;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Parser)]
#[command(
    name = "infracheck",
    version,
    about = "Compliance checks for cloud instances and remote hosts"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    emit_pipeline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Verify compute instances exist and are RUNNING.
    Vm(VmArgs),
    /// Verify the host operating system and expected files.
    Remote(RemoteArgs),
    /// Probe the external tools the checks depend on.
    Doctor,
}

#[derive(Debug, clap::Args)]
struct InputArgs {
    /// Inputs file (.json, .yaml, .yml, or .toml) holding a single object.
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Input override as `key=value`; the value is parsed as JSON when possible.
    #[arg(long = "input", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Evaluate only the named control (repeatable).
    #[arg(long = "control", value_name = "ID")]
    controls: Vec<String>,
}

#[derive(Debug, clap::Args)]
struct VmArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(Debug, clap::Args)]
struct RemoteArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Host to inspect: `local`, `local://<root>`, or `ssh://[user@]host[:port]`.
    #[arg(long, default_value = "local")]
    target: String,

    /// Identity file passed to ssh.
    #[arg(long)]
    identity: Option<PathBuf>,
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };
    logging::init();

    let emit_pipeline = cli.emit_pipeline;
    match cli.command {
        Commands::Vm(args) => run_vm(args, emit_pipeline),
        Commands::Remote(args) => run_remote(args, emit_pipeline),
        Commands::Doctor => run_doctor(emit_pipeline),
    }
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

fn run_vm(args: VmArgs, emit_pipeline: bool) -> i32 {
    let command_args = vm::VmCommandArgs {
        inputs: args.input.inputs.clone(),
        overrides: args.input.overrides.clone(),
        controls: args.input.controls.clone(),
    };
    let inventory = GcloudInventory::from_env();
    let response = vm::run(&command_args, &inventory);
    let exit_code = emit_response("vm", &response);

    if emit_pipeline {
        let report = PipelineReport::new(
            "vm",
            pipeline_input(&args.input),
            vm::pipeline_steps(),
            vm::guards(),
        )
        .mark_external_tool_used("gcloud");
        emit_pipeline_report(&report);
    }
    exit_code
}

fn run_remote(args: RemoteArgs, emit_pipeline: bool) -> i32 {
    let target = match HostTarget::parse(&args.target) {
        Ok(target) => target,
        Err(message) => {
            emit_error(
                "input_usage_error",
                message,
                json!({"command": "remote", "target": &args.target}),
                3,
            );
            return 3;
        }
    };
    let command_args = remote::RemoteCommandArgs {
        inputs: args.input.inputs.clone(),
        overrides: args.input.overrides.clone(),
        controls: args.input.controls.clone(),
    };
    let host = adapters::host_inspector(&target, args.identity.as_deref());
    let response = remote::run(&command_args, host.as_ref());
    let exit_code = emit_response("remote", &response);

    if emit_pipeline {
        let mut sources = pipeline_input(&args.input).sources;
        sources.push(PipelineInputSource::argument("target"));
        let mut report = PipelineReport::new(
            "remote",
            PipelineInput::new(sources),
            remote::pipeline_steps(),
            remote::guards(),
        );
        if matches!(target, HostTarget::Ssh(_)) {
            report = report.mark_external_tool_used("ssh");
        }
        emit_pipeline_report(&report);
    }
    exit_code
}

fn run_doctor(emit_pipeline: bool) -> i32 {
    let response = doctor::run();
    let exit_code = if emit_json_stdout(&response.payload) {
        response.exit_code
    } else {
        emit_error(
            "internal_error",
            "failed to serialize doctor response".to_string(),
            json!({"command": "doctor"}),
            1,
        );
        1
    };

    if emit_pipeline {
        let report = PipelineReport::new(
            "doctor",
            PipelineInput::new(Vec::new()),
            doctor::pipeline_steps(),
            doctor::guards(),
        )
        .mark_external_tool_used("gcloud")
        .mark_external_tool_used("ssh");
        emit_pipeline_report(&report);
    }
    exit_code
}

/// Reports go to stdout; usage and collaborator errors go to stderr.
fn emit_response(command: &str, response: &CommandResponse) -> i32 {
    let emitted = match response.exit_code {
        0 | 2 => emit_json_stdout(&response.payload),
        3 | 1 => emit_json_stderr(&response.payload),
        other => {
            emit_error(
                "internal_error",
                format!("unexpected {command} exit code: {other}"),
                json!({"command": command}),
                1,
            );
            return 1;
        }
    };
    if emitted {
        response.exit_code
    } else {
        emit_error(
            "internal_error",
            format!("failed to serialize {command} response"),
            json!({"command": command}),
            1,
        );
        1
    }
}

fn pipeline_input(args: &InputArgs) -> PipelineInput {
    let mut sources = Vec::with_capacity(2);
    if let Some(path) = &args.inputs {
        let format = infracheck_io::resolve_input_format(path).ok();
        sources.push(PipelineInputSource::path(
            "inputs",
            path.display().to_string(),
            format.map(infracheck_io::Format::as_str),
        ));
    }
    if !args.overrides.is_empty() {
        sources.push(PipelineInputSource::argument("input_overrides"));
    }
    PipelineInput::new(sources)
}

fn emit_json_stdout(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            println!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_json_stderr(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            eprintln!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_pipeline_report(report: &PipelineReport) {
    match serde_json::to_string(report) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(error) => emit_error(
            "internal_error",
            format!("failed to serialize pipeline report: {error}"),
            json!({"command": "emit_pipeline"}),
            1,
        ),
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
