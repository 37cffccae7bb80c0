//! The configure, build and test sequence.

use crate::cmake::{build_project, configure_project, test_project};
use crate::context::Context;
use crate::error::Result;
use crate::exec::Executor;
use crate::output::OutputSink;

/// Name of the output carrying the resolved build directory.
pub const BUILD_DIR_OUTPUT: &str = "build-dir";

/// Configures the project, publishes the build directory, then builds and
/// tests it if those steps are enabled.
///
/// Steps run one after another and the first failure stops the run.
pub fn run(context: &Context, executor: &mut dyn Executor, sink: &mut dyn OutputSink) -> Result<()> {
    configure_project(context, executor)?;

    sink.set_output(BUILD_DIR_OUTPUT, &context.build_dir)?;

    if context.build.enabled {
        build_project(context, executor)?;
    }

    if context.test.enabled {
        test_project(context, executor)?;
    }

    Ok(())
}
