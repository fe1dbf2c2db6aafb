//! The three developer tools: env translator, stack supervisor, and config initializer.

pub mod initializer;
pub mod supervisor;
pub mod translator;
