//! User-facing output

pub mod logging;
mod report;

pub use report::{format_creating_directory, format_error, format_installed, Reporter, PROGRAM};
