//! JSON-lines audit trail of guarded requests.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::ApiError;

use super::entry::AuditEntry;

/// Append-only audit file, one JSON object per line.
///
/// Shared between request tasks; writes are serialized by a mutex so lines
/// never interleave.
pub struct AuditLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl AuditLogger {
    /// Open (or create) the audit file at `path`, creating missing parent
    /// directories.
    pub fn new(path: &Path) -> Result<Self, ApiError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Opened audit log");

        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Write one entry and flush it to disk.
    pub fn append(&self, entry: &AuditEntry) -> Result<(), ApiError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(&line)?;
        if let Err(e) = file.sync_data() {
            warn!(error = %e, "Failed to sync audit log");
        }
        Ok(())
    }

    /// Write an entry, logging instead of failing. A broken audit file must
    /// not turn into a failed request.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(e) = self.append(entry) {
            warn!(
                request_id = %entry.request_id,
                path = %self.path.display(),
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// [`AuditLogger::record`] on the blocking pool, so the file write and
    /// sync never stall an async worker. Resolves once the entry is on disk.
    pub async fn record_async(self: Arc<Self>, entry: AuditEntry) {
        let request_id = entry.request_id;
        if let Err(e) = tokio::task::spawn_blocking(move || self.record(&entry)).await {
            warn!(%request_id, error = %e, "Audit write task failed");
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn accepted(path: &str) -> AuditEntry {
        AuditEntry::success(
            "2024-03-20T10:00:00.000000Z".to_string(),
            Uuid::new_v4(),
            "GET".to_string(),
            path.to_string(),
            Some("medscheduler_client".to_string()),
            200,
            3,
        )
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("var/log/medscheduler/audit.log");

        let logger = AuditLogger::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(logger.path(), path);
    }

    #[test]
    fn test_one_line_per_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        let logger = AuditLogger::new(&path).unwrap();

        logger.append(&accepted("/patients")).unwrap();
        logger.record(&AuditEntry::failure(
            "2024-03-20T10:00:01.000000Z".to_string(),
            Uuid::new_v4(),
            "POST".to_string(),
            "/appointments".to_string(),
            None,
            "TIMESTAMP_OUT_OF_WINDOW".to_string(),
            "Timestamp too old or too far in the future".to_string(),
            0,
        ));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["result"]["http_status"], 200);
        assert_eq!(lines[1]["result"]["error_code"], "TIMESTAMP_OUT_OF_WINDOW");
        assert!(lines[1]["client_id"].is_null());
    }

    #[tokio::test]
    async fn test_record_async_writes_before_resolving() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        let logger = Arc::new(AuditLogger::new(&path).unwrap());

        Arc::clone(&logger).record_async(accepted("/patients")).await;
        Arc::clone(&logger).record_async(accepted("/appointments")).await;

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["path"], "/appointments");
    }

    #[test]
    fn test_reopen_keeps_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");

        AuditLogger::new(&path)
            .unwrap()
            .append(&accepted("/patients"))
            .unwrap();
        AuditLogger::new(&path)
            .unwrap()
            .append(&accepted("/appointments"))
            .unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines[0]["path"], "/patients");
        assert_eq!(lines[1]["path"], "/appointments");
    }
}
