pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod git;
pub mod logging;

pub use config::Config;
