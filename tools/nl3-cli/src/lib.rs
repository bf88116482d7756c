//! Library half of the `nl3` tool, split out so the commands can be tested.

pub mod commands;
pub mod config;
