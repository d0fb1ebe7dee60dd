//! Sea route CLI library.
//!
//! This crate provides the command handlers, output formats and logging setup
//! behind the `searoute` binary.

pub mod commands;
pub mod logging;
pub mod output;
