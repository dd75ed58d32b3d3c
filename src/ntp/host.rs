use std::process::{Command, Stdio};

use tracing::debug;

use super::NtpError;

/// What a finished command left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The host facilities the NTP check depends on.
#[cfg_attr(test, mockall::automock)]
pub trait Host {
    fn is_root(&self) -> bool;
    fn run(&self, program: &str, args: &[&'static str]) -> Result<CommandOutput, NtpError>;
    fn has_executable(&self, name: &str) -> bool;
}

/// The machine the check runs on.
pub struct SystemHost;

impl Host for SystemHost {
    fn is_root(&self) -> bool {
        nix::unistd::Uid::current().is_root()
    }

    fn run(&self, program: &str, args: &[&'static str]) -> Result<CommandOutput, NtpError> {
        debug!(program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| NtpError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code(),
        })
    }

    fn has_executable(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }
}
