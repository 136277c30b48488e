//! Uniform resource teardown
//!
//! Every closable resource acquired during a run (transport session, SFTP
//! channel, local file handles) is released through the same discipline: an
//! explicit close on the success path whose failure is reported as a
//! [`SftpCopyError::CloseError`]. On error paths, drop order releases the
//! resources in reverse order of acquisition.

use crate::error::{Result, SftpCopyError};

/// A resource with a single close capability.
///
/// Implementations consume the resource, so a successful close is also the
/// last use of the value.
pub trait CloseResource {
    /// Close the resource, reporting any failure as a plain diagnostic.
    fn close_resource(self) -> std::result::Result<(), String>;
}

impl CloseResource for ssh2::Session {
    fn close_resource(self) -> std::result::Result<(), String> {
        self.disconnect(None, "transfer complete", None)
            .map_err(|e| e.to_string())
    }
}

impl CloseResource for ssh2::Sftp {
    fn close_resource(mut self) -> std::result::Result<(), String> {
        self.shutdown().map_err(|e| e.to_string())
    }
}

impl CloseResource for std::fs::File {
    // sync_all is the only point where close failures of a std File are
    // observable; the handle itself is released by the drop that follows.
    fn close_resource(self) -> std::result::Result<(), String> {
        self.sync_all().map_err(|e| e.to_string())
    }
}

/// Close `resource`, converting any failure into a fatal [`SftpCopyError`].
///
/// `label` names the resource in the diagnostic (e.g. "sftp channel").
pub fn close_resource<R: CloseResource>(resource: R, label: &str) -> Result<()> {
    resource
        .close_resource()
        .map_err(|message| SftpCopyError::close(label, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    struct FailingResource;

    impl CloseResource for FailingResource {
        fn close_resource(self) -> std::result::Result<(), String> {
            Err("simulated close failure".to_string())
        }
    }

    struct CleanResource;

    impl CloseResource for CleanResource {
        fn close_resource(self) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_close_failure_is_fatal_and_labelled() {
        let err = close_resource(FailingResource, "test resource").unwrap_err();
        assert!(matches!(err, SftpCopyError::CloseError { .. }));
        assert_eq!(
            err.to_string(),
            "Close error on test resource: simulated close failure"
        );
    }

    #[test]
    fn test_clean_close_succeeds() {
        assert!(close_resource(CleanResource, "test resource").is_ok());
    }

    #[test]
    fn test_error_exit_releases_in_reverse_acquisition_order() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Tracked {
            label: &'static str,
            order: Rc<RefCell<Vec<&'static str>>>,
        }

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.order.borrow_mut().push(self.label);
            }
        }

        let order = Rc::new(RefCell::new(Vec::new()));

        let run = |order: Rc<RefCell<Vec<&'static str>>>| -> Result<()> {
            let _store = Tracked { label: "trust store", order: order.clone() };
            let _session = Tracked { label: "session", order: order.clone() };
            let _sftp = Tracked { label: "sftp channel", order: order.clone() };
            let _dest = Tracked { label: "destination file", order };

            // Induced mid-copy failure; every acquired resource must
            // still be released on the way out.
            Err(SftpCopyError::RemoteTransferError("copy failed".to_string()))
        };

        assert!(run(order.clone()).is_err());
        assert_eq!(
            *order.borrow(),
            vec!["destination file", "sftp channel", "session", "trust store"]
        );
    }

    #[test]
    fn test_file_close_syncs_to_stable_storage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("durable.bin");

        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"payload").unwrap();
        close_resource(file, "local destination file").unwrap();

        // Contents must be observable through a fresh handle.
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }
}
