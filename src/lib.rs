//! Library crate root for the Eventura developer tooling.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod cli;
pub mod config;
pub mod runtime;
pub mod tools;
