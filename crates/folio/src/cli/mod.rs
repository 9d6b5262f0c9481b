//! Command-line interface modules.

pub mod config;
pub mod interactive;
pub mod render;
