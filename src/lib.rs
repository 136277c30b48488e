//! # SftpCopy - Single-File SFTP Transfer
//!
//! SftpCopy copies one file between the local filesystem and a remote host
//! over SSH/SFTP, in either direction. It is deliberately small: one
//! connection, one transfer, one exit code.
//!
//! ## Features
//!
//! - **Pinned host keys**: the remote identity is resolved from an
//!   OpenSSH-style known_hosts file before connecting, and the session is
//!   only established on an exact key match
//! - **Password authentication**: single method, no fallback chain
//! - **Directional transfers**: upload or download of a single file
//! - **Durable downloads**: the local destination is synced to stable
//!   storage before the run reports success
//! - **Loud teardown**: a failure to close any acquired resource fails
//!   the run, even after a successful copy
//!
//! ## Quick Start
//!
//! ```no_run
//! use sftpcopy::config::RemoteConfig;
//! use sftpcopy::network::SshConnection;
//! use sftpcopy::trust::{default_known_hosts_path, resolve_host_key};
//! use std::path::Path;
//!
//! let key = resolve_host_key("example.com", &default_known_hosts_path()).unwrap();
//!
//! let config = RemoteConfig {
//!     host: "example.com".to_string(),
//!     user: "john".to_string(),
//!     port: 22,
//! };
//!
//! let conn = SshConnection::connect(&config, "secret", &key).unwrap();
//! let bytes = conn
//!     .download(Path::new("/srv/report.pdf"), Path::new("report.pdf"))
//!     .unwrap();
//! conn.close().unwrap();
//!
//! println!("{} bytes copied", bytes);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod network;
pub mod teardown;
pub mod trust;

// Re-export commonly used types
pub use config::{CliArgs, RemoteConfig, TransferAction, TransferConfig, TransferRequest};
pub use error::{Result, SftpCopyError};
pub use network::SshConnection;
pub use trust::{resolve_host_key, TrustedKey};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
