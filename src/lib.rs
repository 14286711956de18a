//! Command line, logging and config plumbing for the board scraper.

pub mod cli;
pub mod config;
pub mod logging;
pub mod ui;
