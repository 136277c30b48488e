//! SftpCopy CLI - Single-File SFTP Transfer Utility
//!
//! Copies one file between the local filesystem and a remote host over
//! SSH/SFTP, with the remote identity pinned to a known_hosts entry.

use clap::Parser;
use sftpcopy::config::{CliArgs, TransferAction, TransferConfig};
use sftpcopy::error::Result;
use sftpcopy::network::SshConnection;
use sftpcopy::trust::resolve_host_key;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();

    // Require source and destination before any network activity
    if args.src.is_none() || args.dest.is_none() {
        eprintln!("Usage: sftpcopy --action <upload|download> --user <USER> --host <HOST> --src <PATH> --dest <PATH>");
        eprintln!("       sftpcopy --help for more information");
        std::process::exit(1);
    }

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config =
        TransferConfig::from_cli(&args).map_err(sftpcopy::error::SftpCopyError::ConfigError)?;

    // Print configuration if verbose
    if args.verbose > 0 {
        print_config(&config);
    }

    // Resolve the host key to pin, then open the session against it
    let trusted_key = resolve_host_key(&config.remote.host, &config.known_hosts)?;
    let conn = SshConnection::connect(&config.remote, &config.password, &trusted_key)?;

    // Perform the single transfer
    let bytes = conn.transfer(&config.request)?;

    conn.close()?;

    // Print results
    if !args.quiet {
        let direction = match config.request.action {
            TransferAction::Upload => "uploaded",
            TransferAction::Download => "downloaded",
        };
        println!(
            "{} bytes {} ({})",
            bytes,
            direction,
            humansize::format_size(bytes, humansize::BINARY)
        );
    }

    Ok(())
}

fn print_config(config: &TransferConfig) {
    println!("=== Configuration ===");
    println!("Remote:      {}@{}:{}", config.remote.user, config.remote.host, config.remote.port);
    println!("Action:      {:?}", config.request.action);
    println!("Source:      {:?}", config.request.source);
    println!("Destination: {:?}", config.request.destination);
    println!("Trust store: {:?}", config.known_hosts);
    println!();
}
