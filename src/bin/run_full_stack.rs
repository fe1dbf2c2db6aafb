//! Entry point for `run-full-stack`.
use std::process::ExitCode;

use clap::Parser;
use eventura_devkit::{
    cli::{execute_run_full_stack, RunFullStackArgs},
    lib::telemetry,
    runtime::RuntimeExit,
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(code),
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<u8, RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = RunFullStackArgs::parse();
    execute_run_full_stack(args).await
}
