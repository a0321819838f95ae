// ABOUTME: Environment variable names and lookup helpers
// ABOUTME: Single place that knows how Scansheet reads its environment

pub mod constants;
pub mod env;

pub use env::{env_or, env_string};
