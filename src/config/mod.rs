//! Configuration module for colloquy
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::Settings;
