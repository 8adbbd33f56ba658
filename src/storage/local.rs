//! Local filesystem ledger.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::CooldownLedger;
use crate::storage::{LedgerFile, LedgerStorage};
use crate::utils::as_float;

/// Ledger stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalLedger {
    path: PathBuf,
}

impl LocalLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp path: `state.json` -> `state.json.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Decode either the versioned or the legacy flat shape.
    fn decode(&self, payload: Value) -> CooldownLedger {
        let Value::Object(mut body) = payload else {
            log::warn!(
                "Unexpected state file format in {}; ignoring",
                self.path.display()
            );
            return CooldownLedger::new();
        };

        let raw = match body.remove("last_searched") {
            Some(Value::Object(nested)) => nested,
            other => {
                if let Some(value) = other {
                    body.insert("last_searched".to_string(), value);
                }
                if !body.is_empty() {
                    log::warn!(
                        "State file {} uses the legacy flat format; it will be rewritten on next save",
                        self.path.display()
                    );
                }
                body
            }
        };

        CooldownLedger::from_entries(timestamps(raw))
    }
}

/// Keep entries whose timestamp parses as a finite number.
fn timestamps(raw: Map<String, Value>) -> BTreeMap<String, f64> {
    raw.into_iter()
        .filter_map(|(key, value)| {
            as_float(&value)
                .filter(|ts| ts.is_finite())
                .map(|ts| (key, ts))
        })
        .collect()
}

#[async_trait]
impl LedgerStorage for LocalLedger {
    async fn load(&self) -> CooldownLedger {
        let bytes = match self.read_bytes().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return CooldownLedger::new(),
            Err(e) => {
                log::warn!("State file unreadable ({}): {}", self.path.display(), e);
                return CooldownLedger::new();
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(payload) => self.decode(payload),
            Err(e) => {
                log::warn!("State file unreadable ({}): {}", self.path.display(), e);
                CooldownLedger::new()
            }
        }
    }

    async fn save(&self, ledger: &CooldownLedger) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(&LedgerFile::from(ledger))?;
        bytes.push(b'\n');
        self.write_bytes(&bytes).await
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
