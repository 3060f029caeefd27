pub mod cli;
pub mod commands;
pub mod config;
pub mod correlate;
pub mod error;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod table;
pub mod tracker;
pub mod util;
