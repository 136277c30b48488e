//! SSH/SFTP remote transfer
//!
//! Provides secure single-file transfer over SSH using the SFTP protocol.
//! The session is only established if the server presents exactly the
//! public key resolved from the trust store; there is no prompt, no
//! accept-any mode, and no trust-on-first-use.

use crate::config::{RemoteConfig, TransferAction, TransferRequest};
use crate::error::{Result, SftpCopyError};
use crate::teardown::close_resource;
use crate::trust::TrustedKey;
use ssh2::{Session, Sftp};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::Path;

/// Buffer size for the sequential copy loop
const COPY_BUFFER_SIZE: usize = 1024 * 1024;

/// Authenticated SSH connection to a remote host
pub struct SshConnection {
    /// SSH session
    session: Session,
    /// Remote configuration
    config: RemoteConfig,
}

impl std::fmt::Debug for SshConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshConnection")
            .field("config", &self.config)
            .finish()
    }
}

impl SshConnection {
    /// Connect to the remote host and authenticate.
    ///
    /// The server's host key is compared byte-for-byte against
    /// `trusted_key` before any credentials are sent; a mismatch aborts
    /// the bootstrap.
    pub fn connect(
        config: &RemoteConfig,
        password: &str,
        trusted_key: &TrustedKey,
    ) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let tcp = TcpStream::connect(&addr)
            .map_err(|e| SftpCopyError::connection(&config.host, e.to_string()))?;

        let mut session = Session::new()
            .map_err(|e| SftpCopyError::connection(&config.host, e.to_string()))?;

        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| SftpCopyError::connection(&config.host, e.to_string()))?;

        Self::verify_host_key(&session, config, trusted_key)?;
        Self::authenticate(&session, config, password)?;

        tracing::info!("Connected to {}@{}:{}", config.user, config.host, config.port);

        Ok(Self {
            session,
            config: config.clone(),
        })
    }

    /// Pin the server identity: accept only an exact match against the
    /// resolved trusted key
    fn verify_host_key(
        session: &Session,
        config: &RemoteConfig,
        trusted_key: &TrustedKey,
    ) -> Result<()> {
        let (server_key, _) = session.host_key().ok_or_else(|| {
            SftpCopyError::connection(&config.host, "server presented no host key")
        })?;

        if server_key != trusted_key.key.as_slice() {
            return Err(SftpCopyError::HostKeyMismatch {
                host: config.host.clone(),
            });
        }

        tracing::debug!(
            "Host key for {} matches pinned {} entry",
            config.host,
            trusted_key.key_type
        );
        Ok(())
    }

    /// Authenticate with the remote host (password only)
    fn authenticate(session: &Session, config: &RemoteConfig, password: &str) -> Result<()> {
        session
            .userauth_password(&config.user, password)
            .map_err(|e| SftpCopyError::auth(&config.user, &config.host, e.to_string()))?;

        if !session.authenticated() {
            return Err(SftpCopyError::auth(
                &config.user,
                &config.host,
                "Authentication failed",
            ));
        }

        Ok(())
    }

    /// Perform the transfer described by `request`, returning the number
    /// of bytes copied
    pub fn transfer(&self, request: &TransferRequest) -> Result<u64> {
        match request.action {
            TransferAction::Upload => self.upload(&request.source, &request.destination),
            TransferAction::Download => self.download(&request.source, &request.destination),
        }
    }

    /// Upload a local file to the remote host
    pub fn upload(&self, local_path: &Path, remote_path: &Path) -> Result<u64> {
        let sftp = self.open_sftp()?;

        let local_file = std::fs::File::open(local_path)
            .map_err(|e| SftpCopyError::io(local_path, e))?;

        let mut remote_file = sftp
            .create(remote_path)
            .map_err(|e| SftpCopyError::RemoteTransferError(e.to_string()))?;

        let mut reader = std::io::BufReader::with_capacity(COPY_BUFFER_SIZE, local_file);
        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut bytes_copied = 0u64;

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| SftpCopyError::io(local_path, e))?;

            if bytes_read == 0 {
                break;
            }

            remote_file
                .write_all(&buffer[..bytes_read])
                .map_err(|e| SftpCopyError::RemoteTransferError(e.to_string()))?;

            bytes_copied += bytes_read as u64;
        }

        tracing::debug!("Uploaded {} bytes to {:?}", bytes_copied, remote_path);

        // Release in reverse order of acquisition. Remote handle close
        // failures surface through the channel shutdown that follows.
        drop(remote_file);
        close_resource(reader.into_inner(), "local source file")?;
        close_resource(sftp, "sftp channel")?;

        Ok(bytes_copied)
    }

    /// Download a remote file to the local filesystem.
    ///
    /// The destination is synced to stable storage before this returns.
    pub fn download(&self, remote_path: &Path, local_path: &Path) -> Result<u64> {
        let sftp = self.open_sftp()?;

        let mut remote_file = sftp
            .open(remote_path)
            .map_err(|e| SftpCopyError::RemoteTransferError(e.to_string()))?;

        let local_file = std::fs::File::create(local_path)
            .map_err(|e| SftpCopyError::io(local_path, e))?;

        let mut writer = std::io::BufWriter::with_capacity(COPY_BUFFER_SIZE, local_file);
        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut bytes_copied = 0u64;

        loop {
            let bytes_read = remote_file
                .read(&mut buffer)
                .map_err(|e| SftpCopyError::RemoteTransferError(e.to_string()))?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| SftpCopyError::io(local_path, e))?;

            bytes_copied += bytes_read as u64;
        }

        writer
            .flush()
            .map_err(|e| SftpCopyError::io(local_path, e))?;
        let local_file = writer
            .into_inner()
            .map_err(|e| SftpCopyError::io(local_path, e.into_error()))?;

        tracing::debug!("Downloaded {} bytes to {:?}", bytes_copied, local_path);

        // Release in reverse order of acquisition; closing the local
        // destination syncs it to stable storage.
        close_resource(local_file, "local destination file")?;
        drop(remote_file);
        close_resource(sftp, "sftp channel")?;

        Ok(bytes_copied)
    }

    /// Close the transport session
    pub fn close(self) -> Result<()> {
        tracing::debug!("Closing session to {}", self.config.host);
        close_resource(self.session, "ssh session")
    }

    /// Open the SFTP sub-client for one transfer invocation
    fn open_sftp(&self) -> Result<Sftp> {
        self.session
            .sftp()
            .map_err(|e| SftpCopyError::connection(&self.config.host, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require an SSH server to be available.
    // They are marked as ignore by default.

    fn test_config() -> RemoteConfig {
        RemoteConfig {
            host: "localhost".to_string(),
            user: "test".to_string(),
            port: 22,
        }
    }

    fn test_key() -> TrustedKey {
        TrustedKey {
            key_type: "ssh-ed25519".to_string(),
            key: vec![0u8; 32],
        }
    }

    #[test]
    #[ignore]
    fn test_connect_rejects_unpinned_key() {
        // A zeroed key can never equal the server's real host key.
        let err = SshConnection::connect(&test_config(), "test", &test_key()).unwrap_err();
        assert!(matches!(err, SftpCopyError::HostKeyMismatch { .. }));
    }

    #[test]
    #[ignore]
    fn test_upload_download_round_trip() {
        use std::io::Write;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let src = dir.path().join("payload.bin");
        let back = dir.path().join("payload_back.bin");
        let mut file = std::fs::File::create(&src).unwrap();
        file.write_all(&vec![0x5Au8; 4096]).unwrap();

        let key = crate::trust::resolve_host_key(
            "localhost",
            &crate::trust::default_known_hosts_path(),
        )
        .unwrap();
        let conn = SshConnection::connect(&test_config(), "test", &key).unwrap();

        let uploaded = conn
            .upload(&src, Path::new("/tmp/sftpcopy_roundtrip.bin"))
            .unwrap();
        assert_eq!(uploaded, 4096);

        let downloaded = conn
            .download(Path::new("/tmp/sftpcopy_roundtrip.bin"), &back)
            .unwrap();
        assert_eq!(downloaded, 4096);

        assert_eq!(std::fs::read(&src).unwrap(), std::fs::read(&back).unwrap());
        conn.close().unwrap();
    }

    #[test]
    #[ignore]
    fn test_empty_file_round_trip() {
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let src = dir.path().join("empty.bin");
        std::fs::File::create(&src).unwrap();

        let key = crate::trust::resolve_host_key(
            "localhost",
            &crate::trust::default_known_hosts_path(),
        )
        .unwrap();
        let conn = SshConnection::connect(&test_config(), "test", &key).unwrap();

        let uploaded = conn
            .upload(&src, Path::new("/tmp/sftpcopy_empty.bin"))
            .unwrap();
        assert_eq!(uploaded, 0);

        let back = dir.path().join("empty_back.bin");
        let downloaded = conn
            .download(Path::new("/tmp/sftpcopy_empty.bin"), &back)
            .unwrap();
        assert_eq!(downloaded, 0);
        assert_eq!(std::fs::metadata(&back).unwrap().len(), 0);

        conn.close().unwrap();
    }
}
