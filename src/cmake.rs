//! Argument vectors for the `cmake` and `ctest` invocations.

use crate::context::Context;
use crate::error::Result;
use crate::exec::Executor;

pub const CMAKE: &str = "cmake";
pub const CTEST: &str = "ctest";

/// Arguments for configuring the project:
/// `[source-dir] -B <build-dir> [-G <generator>] -D<option>... <args>...`
pub fn configure_args(context: &Context) -> Vec<String> {
    let mut args = Vec::new();

    if !context.source_dir.is_empty() {
        args.push(context.source_dir.clone());
    }

    args.push("-B".to_string());
    args.push(context.build_dir.clone());

    if !context.configure.generator.is_empty() {
        args.push("-G".to_string());
        args.push(context.configure.generator.clone());
    }

    args.extend(context.configure.options.iter().map(|opt| format!("-D{opt}")));
    args.extend(context.configure.args.iter().cloned());
    args
}

/// Arguments for building: `--build <build-dir> <build-args>...`
pub fn build_args(context: &Context) -> Vec<String> {
    let mut args = vec!["--build".to_string(), context.build_dir.clone()];
    args.extend(context.build.args.iter().cloned());
    args
}

/// Arguments for testing: `--test-dir <build-dir> <test-args>...`
pub fn test_args(context: &Context) -> Vec<String> {
    let mut args = vec!["--test-dir".to_string(), context.build_dir.clone()];
    args.extend(context.test.args.iter().cloned());
    args
}

pub fn configure_project(context: &Context, executor: &mut dyn Executor) -> Result<()> {
    executor.exec(CMAKE, &configure_args(context))
}

pub fn build_project(context: &Context, executor: &mut dyn Executor) -> Result<()> {
    executor.exec(CMAKE, &build_args(context))
}

pub fn test_project(context: &Context, executor: &mut dyn Executor) -> Result<()> {
    executor.exec(CTEST, &test_args(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConfigureSettings, StepSettings};
    use crate::exec::RecordingExecutor;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_configure_nothing_specified() {
        assert_eq!(configure_args(&Context::default()), strings(&["-B", "build"]));
    }

    #[test]
    fn test_configure_source_dir() {
        let context = Context {
            source_dir: "project".to_string(),
            ..Context::default()
        };
        assert_eq!(configure_args(&context), strings(&["project", "-B", "build"]));
    }

    #[test]
    fn test_configure_generator() {
        let context = Context {
            configure: ConfigureSettings {
                generator: "Ninja".to_string(),
                ..ConfigureSettings::default()
            },
            ..Context::default()
        };
        assert_eq!(
            configure_args(&context),
            strings(&["-B", "build", "-G", "Ninja"])
        );
    }

    #[test]
    fn test_configure_options_and_args() {
        let context = Context {
            configure: ConfigureSettings {
                generator: String::new(),
                options: strings(&["BUILD_TESTING=ON", "BUILD_EXAMPLES=ON"]),
                args: strings(&["-Wdev", "-Wdeprecated"]),
            },
            ..Context::default()
        };
        assert_eq!(
            configure_args(&context),
            strings(&[
                "-B",
                "build",
                "-DBUILD_TESTING=ON",
                "-DBUILD_EXAMPLES=ON",
                "-Wdev",
                "-Wdeprecated"
            ])
        );
    }

    #[test]
    fn test_configure_all_specified() {
        let context = Context {
            source_dir: "project".to_string(),
            build_dir: "output".to_string(),
            configure: ConfigureSettings {
                generator: "Ninja".to_string(),
                options: strings(&["BUILD_TESTING=ON"]),
                args: strings(&["-Wdev"]),
            },
            ..Context::default()
        };
        assert_eq!(
            configure_args(&context),
            strings(&["project", "-B", "output", "-G", "Ninja", "-DBUILD_TESTING=ON", "-Wdev"])
        );
    }

    #[test]
    fn test_build_args() {
        assert_eq!(build_args(&Context::default()), strings(&["--build", "build"]));

        let context = Context {
            build_dir: "output".to_string(),
            build: StepSettings {
                enabled: true,
                args: strings(&["--target", "foo"]),
            },
            ..Context::default()
        };
        assert_eq!(
            build_args(&context),
            strings(&["--build", "output", "--target", "foo"])
        );
    }

    #[test]
    fn test_test_args() {
        let context = Context {
            build_dir: "output".to_string(),
            test: StepSettings {
                enabled: true,
                args: strings(&["--output-on-failure"]),
            },
            ..Context::default()
        };
        assert_eq!(
            test_args(&context),
            strings(&["--test-dir", "output", "--output-on-failure"])
        );
    }

    #[test]
    fn test_projects_call_the_right_programs() {
        let context = Context::default();
        let mut executor = RecordingExecutor::default();

        configure_project(&context, &mut executor).unwrap();
        build_project(&context, &mut executor).unwrap();
        test_project(&context, &mut executor).unwrap();

        assert_eq!(
            executor.calls,
            vec![
                (CMAKE.to_string(), strings(&["-B", "build"])),
                (CMAKE.to_string(), strings(&["--build", "build"])),
                (CTEST.to_string(), strings(&["--test-dir", "build"])),
            ]
        );
    }
}
