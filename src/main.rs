use anyhow::Context as _;
use cmake_action::context::Context;
use cmake_action::exec::CommandExecutor;
use cmake_action::inputs::{env_lookup, EnvInputs};
use cmake_action::output::OutputFile;
use cmake_action::{action, gha_debug, gha_error};
use std::process::ExitCode;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Alternate format prints the whole cause chain
            gha_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    // Fail before spawning anything if there is nowhere to put the output
    let mut sink = OutputFile::from_env()?;

    let context = Context::from_inputs(&EnvInputs, Some(&env_lookup))
        .context("failed to read action inputs")?;
    gha_debug!("{:?}", context);

    action::run(&context, &mut CommandExecutor, &mut sink)?;
    gha_debug!("build directory written to {}", sink.path().display());
    Ok(())
}
