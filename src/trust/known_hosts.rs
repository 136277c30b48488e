//! known_hosts trust-store scanning
//!
//! The trust store is a line-oriented text file where each meaningful line
//! is `<host-pattern> <key-type> <base64-key-data>`. Lines with any other
//! field count are skipped. The first entry whose host-pattern field
//! contains the target host name as a substring wins; there is no fallback
//! trust policy when no entry matches.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::error::{Result, SftpCopyError};
use crate::teardown::close_resource;

/// One record from the trust store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKeyEntry {
    /// Host-pattern field (field 0)
    pub host_pattern: String,
    /// Key-type field, e.g. "ssh-ed25519" (field 1)
    pub key_type: String,
    /// Base64-encoded public key blob (field 2)
    pub key_base64: String,
}

/// The public key selected for a host, held for the lifetime of the
/// session bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    /// Key type name from the matching entry
    pub key_type: String,
    /// Decoded public key bytes in SSH wire format
    pub key: Vec<u8>,
}

/// Default per-user trust-store location: `$HOME/.ssh/known_hosts`
pub fn default_known_hosts_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".ssh").join("known_hosts")
}

/// Resolve the key to pin for `host` by scanning the trust store at `path`.
///
/// Matching is substring containment against the host-pattern field, kept
/// for compatibility with existing known_hosts handling: an entry for
/// `myhost.example.com` also matches the host name `myhost`. First match
/// wins; no wildcard semantics are applied.
///
/// No matching entry is an error: the session bootstrap has no fallback
/// trust policy, so the run cannot proceed without a pinned key.
pub fn resolve_host_key(host: &str, path: &Path) -> Result<TrustedKey> {
    let file = File::open(path).map_err(|e| SftpCopyError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut resolved = None;
    for line in (&mut reader).lines() {
        let line = line.map_err(|e| SftpCopyError::io(path, e))?;

        let Some(entry) = parse_line(&line) else {
            continue;
        };

        if !entry.host_pattern.contains(host) {
            continue;
        }

        let key = BASE64_STANDARD
            .decode(entry.key_base64.as_bytes())
            .map_err(|e| SftpCopyError::HostKeyParse {
                host: host.to_string(),
                field: entry.key_base64.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "Pinned {} key for '{}' from entry '{}'",
            entry.key_type,
            host,
            entry.host_pattern
        );

        resolved = Some(TrustedKey {
            key_type: entry.key_type,
            key,
        });
        break;
    }

    close_resource(reader.into_inner(), "trust store")?;

    resolved.ok_or_else(|| SftpCopyError::HostKeyNotFound {
        host: host.to_string(),
        path: path.to_path_buf(),
    })
}

/// Parse one trust-store line; lines without exactly 3 fields are skipped
fn parse_line(line: &str) -> Option<HostKeyEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return None;
    }

    Some(HostKeyEntry {
        host_pattern: fields[0].to_string(),
        key_type: fields[1].to_string(),
        key_base64: fields[2].to_string(),
    })
}
