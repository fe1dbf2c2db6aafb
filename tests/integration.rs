#[path = "integration/common.rs"]
mod common;

#[path = "integration/translator_cli.rs"]
mod translator_cli;

#[path = "integration/initializer_cli.rs"]
mod initializer_cli;

#[path = "integration/supervisor_cli.rs"]
mod supervisor_cli;
