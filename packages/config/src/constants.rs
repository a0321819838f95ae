// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Scansheet

// Server
pub const SCANSHEET_HOST: &str = "SCANSHEET_HOST";
pub const SCANSHEET_PORT: &str = "SCANSHEET_PORT";
pub const PORT: &str = "PORT"; // Fallback used by most PaaS hosts

// Database
pub const SCANSHEET_DB_PATH: &str = "SCANSHEET_DB_PATH";
pub const SCANSHEET_MAX_CONNECTIONS: &str = "SCANSHEET_MAX_CONNECTIONS";

// Client
pub const SCANSHEET_CORS_ORIGIN: &str = "SCANSHEET_CORS_ORIGIN";
pub const SCANSHEET_STATIC_DIR: &str = "SCANSHEET_STATIC_DIR";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

// System
pub const HOME: &str = "HOME";
