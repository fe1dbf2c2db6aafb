//! Entry point for `load-env`.
use std::process::ExitCode;

use clap::Parser;
use eventura_devkit::{
    cli::{execute_load_env, LoadEnvArgs},
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
    let args = LoadEnvArgs::parse();
    execute_load_env(args)
}
