//! Shell command tool: shell_command
//!
//! Off unless `agent.enable_shell_commands` is set. Even when enabled, a
//! command matching the deny-list is refused before anything is spawned.

use chrono::Utc;
use multisource_domain::Locale;
use multisource_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use regex::RegexSet;
use serde::Serialize;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Tool name constant
pub const SHELL_COMMAND: &str = "shell_command";

/// Wall-clock limit for one command
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Matched against the lower-cased command text. The bare `>` blocks every
/// redirection, comparisons included.
const DENIED_PATTERNS: &[&str] = &[
    r"rm\s+-rf",
    r"sudo",
    r"passwd",
    r"chmod\s+777",
    r">",
    r"dd\s+if=",
    r"mkfs",
    r"fdisk",
    r"format",
    r"del\s+",
    r"shutdown",
    r"reboot",
    r"halt",
    r"kill\s+-9",
    r"killall",
];

pub fn shell_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        SHELL_COMMAND,
        "Run a shell command on the host and return its output. \
         Only available when shell commands are enabled; destructive commands are refused.",
        RiskLevel::High,
    )
    .with_parameter(
        ToolParameter::new("command", "The command to execute", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("description", "What the command is meant to find out", false)
            .with_type("string"),
    )
}

/// Output of a command that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub command: String,
    pub description: Option<String>,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    /// RFC 3339, UTC
    pub timestamp: String,
    #[serde(skip)]
    pub exit_code: i32,
}

#[derive(Debug, Clone)]
pub struct ShellCommandTool {
    enabled: bool,
    locale: Locale,
    timeout: Duration,
    deny_list: RegexSet,
}

impl ShellCommandTool {
    pub fn new(enabled: bool, locale: Locale) -> Result<Self, regex::Error> {
        Ok(Self {
            enabled,
            locale,
            timeout: COMMAND_TIMEOUT,
            deny_list: RegexSet::new(DENIED_PATTERNS)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Policy check only; nothing is executed.
    pub fn check(&self, command: &str) -> Result<(), ToolError> {
        if !self.enabled {
            return Err(ToolError::CapabilityDisabled(
                self.locale.shell_disabled_message(),
            ));
        }
        if self.deny_list.is_match(&command.to_lowercase()) {
            warn!(command, "Refused command matching the deny-list");
            return Err(ToolError::UnsafeCommand(self.locale.unsafe_command_message()));
        }
        Ok(())
    }

    pub async fn invoke(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let command = match call.require_string("command") {
            Ok(c) => c,
            Err(e) => return ToolResult::failure(SHELL_COMMAND, ToolError::InvalidArgument(e)),
        };
        let description = call.get_non_empty("description");

        let result = self.run(command, description).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let output = match result {
            Ok(output) => output,
            Err(e) => return ToolResult::failure(SHELL_COMMAND, e).with_duration(duration_ms),
        };

        let metadata = ToolResultMetadata {
            duration_ms: Some(duration_ms),
            exit_code: Some(output.exit_code),
            ..Default::default()
        };
        match serde_json::to_string_pretty(&output) {
            Ok(text) => ToolResult::success(SHELL_COMMAND, text).with_metadata(metadata),
            Err(e) => {
                ToolResult::failure(SHELL_COMMAND, ToolError::CommandExecution(e.to_string()))
            }
        }
    }

    /// Check the command, then run it under the timeout.
    ///
    /// A timeout kills the child and, on Unix, every process it started; a
    /// non-zero exit is reported with its stderr.
    pub async fn run(
        &self,
        command: &str,
        description: Option<&str>,
    ) -> Result<CommandOutput, ToolError> {
        self.check(command)?;
        debug!(command, "Running shell command");

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout can reach the shell's children too
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd
            .spawn()
            .map_err(|e| ToolError::CommandExecution(format!("failed to spawn: {}", e)))?;
        let pid = child.id();

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ToolError::CommandExecution(e.to_string())),
            Err(_) => {
                warn!(command, timeout_secs = self.timeout.as_secs(), "Command timed out");
                kill_process_group(pid);
                return Err(ToolError::CommandTimeout(self.timeout.as_secs()));
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let diagnostic = if stderr.trim().is_empty() {
                format!("exit status {}", exit_code)
            } else {
                stderr.trim().to_string()
            };
            return Err(ToolError::CommandExecution(diagnostic));
        }

        Ok(CommandOutput {
            command: command.to_string(),
            description: description.map(str::to_string),
            stdout,
            stderr,
            success: true,
            timestamp: Utc::now().to_rfc3339(),
            exit_code,
        })
    }
}

/// SIGKILL the process group led by `pid`. The leader itself is also
/// killed when the child handle drops.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group was created by spawn above
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "Could not signal command process group"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
