//! Command-line front end for the dynamic data standardizer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
