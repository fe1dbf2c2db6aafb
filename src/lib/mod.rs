//! Shared library modules providing error types, env file parsing, process helpers, and telemetry initialization.

pub mod envfile;
pub mod errors;
pub mod mask;
pub mod paths;
pub mod process;
pub mod telemetry;
