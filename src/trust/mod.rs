//! Host trust resolution
//!
//! Resolves the public key to pin for a remote host from an OpenSSH-style
//! known_hosts file before any network activity begins.

mod known_hosts;

pub use known_hosts::*;
