//! SRT: Supply Risk Toolkit
//!
//! Deterministic supply-chain risk scoring for electronic components and
//! BOMs, kept as plain YAML records in a project directory.
//!
//! - [`analysis`] - factor scoring, dependency propagation, tier-2 materials, what-if
//! - [`core`] - project discovery, layered configuration and the record store
//! - [`entities`] - record types
//! - [`cli`] - the `srt` command line

pub mod analysis;
pub mod cli;
pub mod core;
pub mod entities;
