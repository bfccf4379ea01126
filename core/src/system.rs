//! Running the external tools (`adb`, `nmap`, `scrcpy`) and telling "not
//! installed" apart from "ran and failed".

use std::io;
use std::process::{Output, Stdio};

use hmdlink_common::error::{HmdError, Result};
use tokio::process::Command;
use tracing::debug;

/// Builds a command that is killed if the awaiting future is dropped, so an
/// elapsed timeout never leaves a stray tool process behind.
pub fn command(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
    cmd
}

/// Runs `program` to completion and returns its raw output.
pub async fn run(program: &str, args: &[&str]) -> Result<Output> {
    debug!("running {program} {}", args.join(" "));
    command(program, args)
        .output()
        .await
        .map_err(|e| spawn_error(program, e))
}

/// Runs `program` and returns its stdout, failing on a non-zero exit status.
pub async fn run_checked(program: &str, args: &[&str]) -> Result<String> {
    let output = run(program, args).await?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = first_non_empty(&[stderr.trim(), stdout.trim()])
            .unwrap_or("exited with a failure status")
            .to_string();
        return Err(HmdError::transport(describe(program, args), message));
    }

    Ok(stdout)
}

/// Checks that `program` can be started at all.
pub async fn require_tool(program: &str, probe_arg: &str) -> Result<()> {
    match run(program, &[probe_arg]).await {
        Ok(_) => Ok(()),
        Err(HmdError::MissingTool { tool }) => Err(HmdError::MissingTool { tool }),
        // It started, so it exists; a failing version probe is not our concern.
        Err(_) => Ok(()),
    }
}

pub fn spawn_error(program: &str, err: io::Error) -> HmdError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => HmdError::MissingTool {
            tool: program.to_string(),
        },
        _ => HmdError::Io(err),
    }
}

pub fn describe(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|s| !s.is_empty())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
