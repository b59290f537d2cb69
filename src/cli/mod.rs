//! CLI module
//!
//! Command-line interface over the resource modules.
//!
//! # Commands
//!
//! - `vips list|get|create|delete` - Load-balancer virtual IPs
//! - `databases list|create|delete` - Databases on an instance
//!
//! List commands stream records page by page, one JSON document per record.

mod commands;
mod runner;

pub use commands::{Cli, Commands, DatabaseCommands, OutputFormat, VipCommands};
pub use runner::Runner;
