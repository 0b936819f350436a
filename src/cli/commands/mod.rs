//! CLI command implementations

pub mod bom;
pub mod completions;
pub mod config;
pub mod deps;
pub mod init;
pub mod score;
pub mod tier2;
pub mod whatif;
