//! Subcommand handlers

pub mod batch;
pub mod completions;
pub mod config;
pub mod segment;
pub mod show;
