//! # Interface Layer
//!
//! Process-facing surface: command-line parsing and the one-shot health check.

pub mod check;
pub mod cli;
