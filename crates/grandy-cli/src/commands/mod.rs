//! CLI subcommand implementations.

pub mod common;
pub mod echo;
pub mod render;
pub mod stitch;
