//! Configuration settings for SftpCopy
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for the transfer operation.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::trust::default_known_hosts_path;

/// SftpCopy - Minimal single-file SFTP transfer utility
#[derive(Parser, Debug, Clone)]
#[command(name = "sftpcopy")]
#[command(author = "SftpCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy a single file to or from a remote host over SFTP")]
#[command(long_about = r#"
SftpCopy copies one file between the local filesystem and a remote host
over SSH/SFTP, in either direction.

The remote host's public key must already be present in the trust store
(an OpenSSH-style known_hosts file); the session is only established if
the server presents exactly that key. Authentication is password-only.

Examples:
  sftpcopy --action upload --user john --host example.com \
           --password secret --src report.pdf --dest /srv/report.pdf

  sftpcopy --action download --user john --host example.com \
           --password secret --src /srv/report.pdf --dest report.pdf

  sftpcopy --action download --user john --host 10.0.0.7 --port 2222 \
           --known-hosts ./trusted_hosts --src /data/a.bin --dest a.bin
"#)]
pub struct CliArgs {
    /// Transfer direction
    #[arg(long, value_enum, default_value = "download")]
    pub action: TransferAction,

    /// Remote user
    #[arg(long, value_name = "USER")]
    pub user: String,

    /// Remote host (must have an entry in the trust store)
    #[arg(long, value_name = "HOST")]
    pub host: String,

    /// Password for user@host
    #[arg(long, default_value = "", value_name = "PASSWORD")]
    pub password: String,

    /// SSH port
    #[arg(long, default_value = "22", value_name = "PORT")]
    pub port: u16,

    /// Trust-store file (default: ~/.ssh/known_hosts)
    #[arg(long, value_name = "PATH")]
    pub known_hosts: Option<PathBuf>,

    /// Source file path (local for upload, remote for download)
    #[arg(long, value_name = "PATH")]
    pub src: Option<PathBuf>,

    /// Destination file path (remote for upload, local for download)
    #[arg(long, value_name = "PATH")]
    pub dest: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Transfer direction
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransferAction {
    /// Copy a local file to the remote host
    #[value(name = "upload")]
    Upload,
    /// Copy a remote file to the local filesystem
    #[default]
    #[value(name = "download")]
    Download,
}

/// Remote host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Remote hostname or IP
    pub host: String,
    /// Username
    pub user: String,
    /// Port
    pub port: u16,
}

/// One fully specified transfer, fixed before any I/O begins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Transfer direction
    pub action: TransferAction,
    /// Source file path
    pub source: PathBuf,
    /// Destination file path
    pub destination: PathBuf,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Remote endpoint
    pub remote: RemoteConfig,
    /// Password for the remote user
    pub password: String,
    /// Trust-store file to resolve the host key from
    pub known_hosts: PathBuf,
    /// The transfer to perform
    pub request: TransferRequest,
}

impl TransferConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let source = args.src.clone().ok_or("Source path required")?;
        let destination = args.dest.clone().ok_or("Destination path required")?;

        if args.host.is_empty() {
            return Err("Remote host required".to_string());
        }
        if args.user.is_empty() {
            return Err("Remote user required".to_string());
        }

        Ok(Self {
            remote: RemoteConfig {
                host: args.host.clone(),
                user: args.user.clone(),
                port: args.port,
            },
            password: args.password.clone(),
            known_hosts: args
                .known_hosts
                .clone()
                .unwrap_or_else(default_known_hosts_path),
            request: TransferRequest {
                action: args.action,
                source,
                destination,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "sftpcopy",
            "--user",
            "john",
            "--host",
            "example.com",
            "--src",
            "/remote/a.bin",
            "--dest",
            "a.bin",
        ]
    }

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(base_args()).unwrap();
        assert_eq!(args.action, TransferAction::Download);
        assert_eq!(args.port, 22);
        assert_eq!(args.password, "");
        assert!(args.known_hosts.is_none());
        assert!(!args.quiet);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_cli_overrides() {
        let mut argv = base_args();
        argv.extend(["--action", "upload", "--port", "2222", "--password", "s3cret"]);
        let args = CliArgs::try_parse_from(argv).unwrap();
        assert_eq!(args.action, TransferAction::Upload);
        assert_eq!(args.port, 2222);
        assert_eq!(args.password, "s3cret");
    }

    #[test]
    fn test_from_cli_builds_request() {
        let args = CliArgs::try_parse_from(base_args()).unwrap();
        let config = TransferConfig::from_cli(&args).unwrap();
        assert_eq!(config.remote.host, "example.com");
        assert_eq!(config.remote.user, "john");
        assert_eq!(config.remote.port, 22);
        assert_eq!(config.request.action, TransferAction::Download);
        assert_eq!(config.request.source, PathBuf::from("/remote/a.bin"));
        assert_eq!(config.request.destination, PathBuf::from("a.bin"));
        assert!(config.known_hosts.ends_with(".ssh/known_hosts"));
    }

    #[test]
    fn test_from_cli_requires_paths() {
        let args = CliArgs::try_parse_from([
            "sftpcopy", "--user", "john", "--host", "example.com",
        ])
        .unwrap();
        let err = TransferConfig::from_cli(&args).unwrap_err();
        assert_eq!(err, "Source path required");
    }

    #[test]
    fn test_known_hosts_override() {
        let mut argv = base_args();
        argv.extend(["--known-hosts", "/tmp/trusted"]);
        let args = CliArgs::try_parse_from(argv).unwrap();
        let config = TransferConfig::from_cli(&args).unwrap();
        assert_eq!(config.known_hosts, PathBuf::from("/tmp/trusted"));
    }
}
