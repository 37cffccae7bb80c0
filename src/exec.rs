//! External command execution module for the action.
//!
//! This module runs `cmake` and `ctest` as child processes. Standard output
//! and error are inherited so the tools' own output goes straight to the log,
//! and standard input is closed.

use crate::error::{Error, Result};
use crate::gha_command;
use std::io::ErrorKind;
use std::process::{Command, ExitStatus, Stdio};

/// Runs a program to completion.
pub trait Executor {
    /// Runs `command` with `args` and waits for it to exit.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The command exited with status 0
    /// * `Err(Error::ExitStatus)` / `Err(Error::Signal)` - It ran but failed
    /// * `Err(Error::NotFound)` / `Err(Error::Spawn)` - It could not be started
    fn exec(&mut self, command: &str, args: &[String]) -> Result<()>;
}

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandExecutor;

impl Executor for CommandExecutor {
    fn exec(&mut self, command: &str, args: &[String]) -> Result<()> {
        gha_command!(command, args);

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::NotFound {
                    command: command.to_string(),
                },
                _ => Error::Spawn {
                    command: command.to_string(),
                    source: e,
                },
            })?;

        let status = child.wait()?;
        check_status(command, status)
    }
}

/// Maps a finished process' status to the action's result.
pub fn check_status(command: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(Error::ExitStatus {
            command: command.to_string(),
            code,
        }),
        // Killed by a signal on Unix
        None => Err(Error::Signal {
            command: command.to_string(),
        }),
    }
}

/// Records calls instead of running anything. Fails the call at `fail_at`.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingExecutor {
    pub calls: Vec<(String, Vec<String>)>,
    pub fail_at: Option<usize>,
}

#[cfg(test)]
impl Executor for RecordingExecutor {
    fn exec(&mut self, command: &str, args: &[String]) -> Result<()> {
        let index = self.calls.len();
        self.calls.push((command.to_string(), args.to_vec()));
        if self.fail_at == Some(index) {
            return Err(Error::ExitStatus {
                command: command.to_string(),
                code: 1,
            });
        }
        Ok(())
    }
}
