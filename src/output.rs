//! Action outputs.
//!
//! The runner collects outputs from the file named by `GITHUB_OUTPUT`, one
//! `name=value` line per output.

use crate::error::{Error, Result};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Receives the named results of a run.
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Appends outputs to the runner's output file.
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Locates the output file through `GITHUB_OUTPUT`.
    pub fn from_env() -> Result<Self> {
        env::var_os(OUTPUT_ENV)
            .map(Self::new)
            .ok_or_else(|| Error::MissingEnv {
                name: OUTPUT_ENV.to_string(),
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for OutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{name}={value}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_set_output_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        fs::write(&path, "previous=1\n").unwrap();

        let mut sink = OutputFile::new(&path);
        sink.set_output("build-dir", "project/build").unwrap();
        sink.set_output("other", "x").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "previous=1\nbuild-dir=project/build\nother=x\n"
        );
    }

    #[test]
    fn test_set_output_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new-output");

        OutputFile::new(&path).set_output("build-dir", "build").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "build-dir=build\n");
    }

    #[test]
    fn test_from_env_requires_output_variable() {
        env::remove_var(OUTPUT_ENV);
        assert!(matches!(
            OutputFile::from_env(),
            Err(Error::MissingEnv { name }) if name == OUTPUT_ENV
        ));

        env::set_var(OUTPUT_ENV, "/tmp/cmake-action-output");
        let sink = OutputFile::from_env().unwrap();
        assert_eq!(sink.path(), Path::new("/tmp/cmake-action-output"));
        env::remove_var(OUTPUT_ENV);
    }

    #[test]
    fn test_set_output_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = OutputFile::new(dir.path().join("missing").join("output"));
        assert!(matches!(
            sink.set_output("build-dir", "build"),
            Err(Error::Io(_))
        ));
    }
}
