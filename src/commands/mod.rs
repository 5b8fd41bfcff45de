//! CLI commands

pub mod generate;
pub mod list;
pub mod parse;
pub mod publish;
pub mod show;
