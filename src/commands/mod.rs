//! CLI subcommands

pub mod fetch;
pub mod list;
pub mod paths;
pub mod sanitize;
