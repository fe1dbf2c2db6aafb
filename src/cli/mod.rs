//! Command execution for the `load-env`, `run-full-stack` and `setup-env` binaries.
use std::{
    env,
    io::{self, Write},
    path::Path,
    sync::Arc,
};

use clap::CommandFactory;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    lib::{
        envfile::EnvFile,
        errors::TranslatorError,
        paths::sibling_executable,
        telemetry::{emit_stack_plan, RunSpan, StackPlanTelemetry},
    },
    runtime::{cancel_on_signal, RuntimeExit},
    tools::{
        initializer::{self, InitializerPaths, SetupOutcome, ShowOutcome, StdinConfirm},
        supervisor::{ClientDefaults, StackPlan, StackSupervisor, StdoutSink},
        translator::{self, LaunchMode},
    },
};

pub mod args;
pub mod profile;

pub use args::{
    CommonArgs, LoadEnvArgs, RunFullStackArgs, SetupArgs, SetupCommand, SetupEnvArgs,
};
pub use profile::Profile;

/// Name of the translator binary the supervisor launches as its default client.
pub const TRANSLATOR_BINARY: &str = "load-env";

const RULE_WIDTH: usize = 40;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Load `.env`, print what will run, and hand the process over to the build tool.
pub fn execute_load_env(args: LoadEnvArgs) -> Result<(), RuntimeExit> {
    let profile = args.common.resolve().map_err(RuntimeExit::from_error)?;
    let section = &profile.config.translator;

    let env_path =
        translator::resolve_env_path(section, &profile.project_root, args.env_file.as_deref());
    let env = EnvFile::load(&env_path).map_err(|err| translator_exit(err.into()))?;
    if !env.is_present() {
        println!(
            "Warning: {} not found. Using default values.",
            env.path().display()
        );
    }

    if args.show_env {
        for line in translator::env_listing(&env) {
            println!("{line}");
        }
    }

    let invocation = translator::build_invocation(section, &args.command, &env);
    println!("Running: {}", invocation.display());
    // exec replaces the process image, so buffered output must go first.
    io::stdout()
        .flush()
        .map_err(|err| RuntimeExit::from_error(anyhow::Error::new(err)))?;

    translator::launch(&invocation, LaunchMode::default()).map_err(translator_exit)
}

fn translator_exit(err: TranslatorError) -> RuntimeExit {
    let exit_code = err.exit_code();
    RuntimeExit::new(err.to_string(), exit_code)
}

/// Run the install step, then the server and client, until interrupted or a child exits.
///
/// Returns the process exit code for a run that started; startup failures are errors.
pub async fn execute_run_full_stack(args: RunFullStackArgs) -> Result<u8, RuntimeExit> {
    let profile = args.common.resolve().map_err(RuntimeExit::from_error)?;
    let translator_binary = sibling_executable(TRANSLATOR_BINARY).map_err(|err| {
        RuntimeExit::from_error(
            anyhow::Error::new(err).context("failed to locate the load-env binary"),
        )
    })?;

    // The client runs inside the project root, so a relative config path must be anchored first.
    let config_file = match profile.config.source_path.as_deref() {
        Some(path) if path.is_relative() => Some(
            env::current_dir()
                .map_err(|err| {
                    RuntimeExit::from_error(
                        anyhow::Error::new(err).context("failed to obtain current directory"),
                    )
                })?
                .join(path),
        ),
        other => other.map(Path::to_path_buf),
    };

    let plan = StackPlan::from_section(
        &profile.config.supervisor,
        &profile.project_root,
        ClientDefaults {
            translator_binary: &translator_binary,
            config_path: config_file.as_deref(),
        },
        args.skip_install,
    );

    let project_root = plan.project_root.display().to_string();
    let config_path = config_file.as_ref().map(|path| path.display().to_string());
    emit_stack_plan(&StackPlanTelemetry {
        project_root: &project_root,
        config_path: config_path.as_deref(),
        install: plan.install.as_ref().map(ToString::to_string),
        server: plan.server.to_string(),
        client: plan.client.to_string(),
        warmup_ms: plan.warmup.as_millis(),
        grace_ms: plan.grace.as_millis(),
    });

    println!("Eventura Full Stack Runner");
    println!("{}", rule());

    let shutdown = CancellationToken::new();
    let force_stop = CancellationToken::new();
    let signal_task = cancel_on_signal(shutdown.clone(), force_stop.clone());
    let run_span = RunSpan::start(Uuid::new_v4());

    let mut supervisor = StackSupervisor::new(plan, Arc::new(StdoutSink), shutdown)
        .with_force_stop(force_stop.clone());
    let result = supervisor
        .run()
        .instrument(run_span.span().clone())
        .await;

    force_stop.cancel();
    let _ = signal_task.await;

    match result {
        Ok(outcome) => {
            let exit_code = outcome.exit_code();
            run_span.finish("completed", exit_code);
            Ok(exit_code)
        }
        Err(err) => {
            run_span.finish("failed", 1);
            Err(RuntimeExit::new(format!("Error: {err}"), 1))
        }
    }
}

/// Dispatch a `setup-env` action (default: `setup`).
pub fn execute_setup_env(args: SetupEnvArgs) -> Result<(), RuntimeExit> {
    let command = args.command.unwrap_or_default();
    if matches!(command, SetupCommand::Help) {
        println!("{}", SetupEnvArgs::command().render_help());
        return Ok(());
    }

    let profile = args.common.resolve().map_err(RuntimeExit::from_error)?;
    let paths = InitializerPaths::resolve(&profile.config.initializer, &profile.project_root);

    match command {
        SetupCommand::Setup(setup_args) => run_setup(&paths, setup_args.force),
        SetupCommand::Show => run_show(&paths),
        SetupCommand::Help => Ok(()),
    }
}

fn run_setup(paths: &InitializerPaths, force: bool) -> Result<(), RuntimeExit> {
    println!("Setting up Eventura environment configuration");
    println!("{}", "=".repeat(50));

    let outcome = initializer::setup(paths, force, &mut StdinConfirm)
        .map_err(|err| RuntimeExit::new(format!("Error: {err}"), 1))?;

    match outcome {
        SetupOutcome::Cancelled => println!("Setup cancelled."),
        SetupOutcome::Created { sensitive_keys } | SetupOutcome::Overwritten { sensitive_keys } => {
            println!(
                "Successfully created {} from {}",
                paths.target.display(),
                paths.template.display()
            );
            for line in initializer::next_steps(&paths.target, &sensitive_keys) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn run_show(paths: &InitializerPaths) -> Result<(), RuntimeExit> {
    let outcome =
        initializer::show(paths).map_err(|err| RuntimeExit::new(format!("Error: {err}"), 1))?;

    match outcome {
        ShowOutcome::Missing => {
            println!(
                "No {} file found. Run setup first.",
                paths.target.display()
            );
        }
        ShowOutcome::Entries(lines) => {
            println!("Current Environment Configuration:");
            println!("{}", rule());
            for line in lines {
                println!("  {line}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translator_exit_keeps_tool_exit_code() {
        let exit = translator_exit(TranslatorError::ToolFailed {
            tool: "flutter".into(),
            exit_code: Some(3),
        });
        assert_eq!(exit.exit_code(), 3);
    }

    #[test]
    fn translator_exit_for_missing_tool_is_one() {
        let exit = translator_exit(TranslatorError::ToolNotFound {
            tool: "flutter".into(),
        });
        assert_eq!(exit.exit_code(), 1);
        assert_eq!(
            exit.message(),
            "Error: flutter not found. Make sure flutter is installed and in your PATH."
        );
    }

    #[test]
    fn setup_help_does_not_need_configuration() {
        let args = SetupEnvArgs {
            common: CommonArgs {
                config_override: Some("/definitely/absent/devkit.toml".into()),
                project_root: None,
            },
            command: Some(SetupCommand::Help),
        };
        assert!(execute_setup_env(args).is_ok());
    }
}
