//! Interactive shell attach
//!
//! The dashboard hands the terminal to `<exec binary> exec -it <id> <shell>`
//! and waits for it to exit. The caller suspends the TUI around `run_exec`.

use std::process::{Command, ExitStatus};

/// Shells offered in the attach menu
pub const SHELLS: [&str; 3] = ["bin/bash", "bin/sh", "bin/ash"];

/// Exit code the engine CLI uses when the container is not running
const NOT_RUNNING_EXIT_CODE: i32 = 1;

pub const NOT_RUNNING_MESSAGE: &str = "Container is not running";
pub const EXEC_FAILED_MESSAGE: &str =
    "OCI runtime exec failed: exec failed: unable to start container process: exec";

/// A shell session waiting to be started by the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub container_id: String,
    pub shell: String,
}

/// Build the exec command. `exec_binary` may carry extra arguments
/// (e.g. `"podman --remote"`) and is split with shell quoting rules.
pub fn exec_command(exec_binary: &str, request: &ExecRequest) -> Result<Command, String> {
    let words = shell_words::split(exec_binary).map_err(|e| e.to_string())?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| "exec binary is empty".to_string())?;

    let mut command = Command::new(program);
    command
        .args(args)
        .args(["exec", "-it", &request.container_id, &request.shell]);
    Ok(command)
}

/// Error panel message for a finished exec, `None` on success
pub fn exit_message(status: ExitStatus) -> Option<&'static str> {
    if status.success() {
        None
    } else if status.code() == Some(NOT_RUNNING_EXIT_CODE) {
        Some(NOT_RUNNING_MESSAGE)
    } else {
        Some(EXEC_FAILED_MESSAGE)
    }
}

/// Run the session with the terminal's stdio, blocking until it exits
pub fn run_exec(exec_binary: &str, request: &ExecRequest) -> Result<(), String> {
    let mut command = exec_command(exec_binary, request).map_err(|e| {
        tracing::warn!("Invalid exec binary {:?}: {}", exec_binary, e);
        EXEC_FAILED_MESSAGE.to_string()
    })?;

    tracing::info!(
        "Attaching {} to container {}",
        request.shell,
        request.container_id
    );

    match command.status() {
        Ok(status) => match exit_message(status) {
            None => Ok(()),
            Some(message) => {
                tracing::warn!("Exec session ended with {}", status);
                Err(message.to_string())
            }
        },
        Err(e) => {
            tracing::warn!("Failed to spawn exec session: {}", e);
            Err(EXEC_FAILED_MESSAGE.to_string())
        }
    }
}
