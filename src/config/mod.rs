//! Configuration module for SftpCopy
//!
//! Provides configuration management including CLI arguments
//! and runtime settings.

mod settings;

pub use settings::*;
