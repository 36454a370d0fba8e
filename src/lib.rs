pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod format;
pub mod invocation;
pub mod logging;
pub mod suggestions;
pub mod transport;
