//! Entry point for `setup-env`.
use std::process::ExitCode;

use clap::Parser;
use eventura_devkit::{
    cli::{execute_setup_env, SetupEnvArgs},
    lib::telemetry,
    runtime::RuntimeExit,
};

fn main() -> ExitCode {
    match bootstrap() {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = SetupEnvArgs::parse();
    execute_setup_env(args)
}
