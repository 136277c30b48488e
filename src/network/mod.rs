//! Network transfer module
//!
//! Provides the SSH/SFTP transport: session bootstrap with fixed host-key
//! pinning, password authentication, and single-file transfers in either
//! direction.

mod ssh;

pub use ssh::*;
