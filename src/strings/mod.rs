//! # Strings Module
//!
//! Centralizes log lines, client-facing messages, and tool descriptions.

pub mod logs;
pub mod messages;
pub mod tools;
