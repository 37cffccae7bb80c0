//! The resolved settings for one run of the action.

use crate::error::{Error, Result};
use crate::inputs::InputProvider;
use crate::parser::{parse_tokens, Lookup};
use std::path::Path;

/// Settings for the `cmake -B` step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureSettings {
    pub generator: String,
    /// `KEY=VALUE` cache entries, passed on as `-DKEY=VALUE`.
    pub options: Vec<String>,
    pub args: Vec<String>,
}

/// Settings for an optional follow-up step (`cmake --build` or `ctest`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSettings {
    pub enabled: bool,
    pub args: Vec<String>,
}

/// Everything needed to configure, build and test a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub source_dir: String,
    pub build_dir: String,
    pub configure: ConfigureSettings,
    pub build: StepSettings,
    pub test: StepSettings,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            source_dir: String::new(),
            build_dir: "build".to_string(),
            configure: ConfigureSettings::default(),
            build: StepSettings::default(),
            test: StepSettings::default(),
        }
    }
}

impl Context {
    /// Builds the context from action inputs.
    ///
    /// `options`, `args`, `build-args` and `test-args` are tokenized with
    /// shell quoting rules; `$` references in them go through `lookup`.
    /// Compiler paths and flags are taken as single values.
    pub fn from_inputs<I>(inputs: &I, lookup: Option<Lookup<'_>>) -> Result<Self>
    where
        I: InputProvider + ?Sized,
    {
        let source_dir = inputs.get_input("source-dir");
        let mut options = Vec::new();

        let input = inputs.get_input("c-compiler");
        if !input.is_empty() {
            options.push(format!("CMAKE_C_COMPILER={input}"));
        }

        let input = inputs.get_input("cxx-compiler");
        if !input.is_empty() {
            options.push(format!("CMAKE_CXX_COMPILER={input}"));
        }

        let input = inputs.get_input("c-flags");
        if !input.is_empty() {
            options.push(format!("CMAKE_C_FLAGS={}", normalize_whitespace(&input)));
        }

        let input = inputs.get_input("cxx-flags");
        if !input.is_empty() {
            options.push(format!("CMAKE_CXX_FLAGS={}", normalize_whitespace(&input)));
        }

        options.extend(parse_input(inputs, "options", lookup)?);

        let build_dir = match inputs.get_input("build-dir") {
            dir if dir.is_empty() => Path::new(&source_dir).join("build").display().to_string(),
            dir => dir,
        };

        Ok(Self {
            build_dir,
            configure: ConfigureSettings {
                generator: inputs.get_input("generator"),
                options,
                args: parse_input(inputs, "args", lookup)?,
            },
            build: StepSettings {
                enabled: inputs.get_input("run-build") == "true",
                args: parse_input(inputs, "build-args", lookup)?,
            },
            test: StepSettings {
                enabled: inputs.get_input("run-test") == "true",
                args: parse_input(inputs, "test-args", lookup)?,
            },
            source_dir,
        })
    }
}

/// Collapses every run of whitespace into a single space.
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_input<I>(inputs: &I, name: &str, lookup: Option<Lookup<'_>>) -> Result<Vec<String>>
where
    I: InputProvider + ?Sized,
{
    parse_tokens(&inputs.get_input(name), lookup).map_err(|source| Error::Input {
        name: name.to_string(),
        source,
    })
}
