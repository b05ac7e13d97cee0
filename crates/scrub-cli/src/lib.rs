//! Library side of the `scrub` binary: logging setup, configuration loading
//! and the file-to-file cleaning run.

pub mod clean;
pub mod config;
pub mod logging;
