//! Configuration management for bedrock.
//!
//! Supports configuration from:
//! - Command-line arguments (highest priority)
//! - Environment variables (`BEDROCK_*`)
//! - A `.env` file loaded at startup

mod settings;

pub use settings::Config;
