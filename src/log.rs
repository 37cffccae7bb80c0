//! Logging through the runner's workflow commands.
//!
//! Everything is written to stdout, where the runner picks up `::debug::`,
//! `::error::` and `[command]` lines.

use crate::parser::quote_arg;
use std::borrow::Cow;

// gha_print macro writes one line to stdout and flushes it
#[macro_export]
macro_rules! gha_print {
    ($($arg:tt)*) => {{
         use std::io::Write;
         let mut stdout = std::io::stdout().lock();
         let _ = writeln!(stdout, $($arg)*);
         let _ = stdout.flush();
    }};
}

// gha_debug macro, only shown when step debugging is enabled
#[macro_export]
macro_rules! gha_debug {
    ($($arg:tt)*) => {{
         $crate::gha_print!("::debug::{}", $crate::log::escape_data(&format!($($arg)*)))
    }};
}

// gha_error macro annotates the run with an error
#[macro_export]
macro_rules! gha_error {
    ($($arg:tt)*) => {{
         $crate::gha_print!("::error::{}", $crate::log::escape_data(&format!($($arg)*)))
    }};
}

// gha_command macro echoes a command line before it runs
#[macro_export]
macro_rules! gha_command {
    ($command:expr, $args:expr) => {{
         $crate::gha_print!("[command]{}", $crate::log::command_line($command, $args))
    }};
}

/// Renders a command and its arguments as a line that can be pasted into a shell.
pub fn command_line(command: &str, args: &[String]) -> String {
    std::iter::once(quote_arg(command))
        .chain(args.iter().map(|arg| quote_arg(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes the characters that would end or corrupt a workflow command message.
pub fn escape_data(message: &str) -> Cow<'_, str> {
    if !message.contains(['%', '\r', '\n']) {
        return Cow::Borrowed(message);
    }
    Cow::Owned(
        message
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A"),
    )
}
