//! CLI library components for rowcast.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
