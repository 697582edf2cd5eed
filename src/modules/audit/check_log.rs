// src/modules/audit/check_log.rs

use crate::common::log;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub const ACTION_CHECK: &str = "check";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckLogEntry {
    pub address: String,
    pub action: String,
    pub result: bool,
    pub timestamp: String,
}

/// Capped JSON-array file of recent check requests. The oldest entries are
/// dropped once `cap` is exceeded.
pub struct CheckLog {
    path: PathBuf,
    cap: usize,
    write_lock: Mutex<()>,
}

impl CheckLog {
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap: cap.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // A missing file or malformed JSON reads as an empty log. Any other read
    // error is returned so `append` never overwrites entries it could not see.
    pub async fn entries(&self) -> io::Result<Vec<CheckLogEntry>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn(&format!("➜ Check log {} malformed, starting over: {}", self.path.display(), e));
                Vec::new()
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn append(&self, entry: CheckLogEntry) -> io::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries().await?;
        entries.push(entry);
        if entries.len() > self.cap {
            let excess = entries.len() - self.cap;
            entries.drain(..excess);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&entries).map_err(io::Error::other)?;
        fs::write(&self.path, bytes).await
    }
}
