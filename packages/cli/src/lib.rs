// ABOUTME: Scansheet server and command line support library
// ABOUTME: Configuration loading and the HTTP server used by the `scansheet` binary

pub mod config;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_app, init_tracing, run_server};

#[cfg(test)]
mod tests;
