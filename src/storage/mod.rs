//! Cooldown ledger persistence.
//!
//! The ledger is read once at start and written at most once per run, after
//! a command was accepted. Writes go through a sibling temp file and a rename
//! so the next run never sees a half-written file.
//!
//! ## File format
//!
//! ```text
//! {
//!   "last_searched": {
//!     "radarr:http://localhost:7878/api/v3:movie:42": 1760000000.5
//!   },
//!   "version": 1
//! }
//! ```
//!
//! Older files hold the flat `{key: timestamp}` mapping; both are accepted.

pub mod local;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::CooldownLedger;

// Re-export for convenience
pub use local::LocalLedger;

/// Current on-disk format version.
pub const LEDGER_VERSION: u32 = 1;

/// Serialized ledger body.
///
/// Field order mirrors sorted-key output.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerFile {
    pub last_searched: BTreeMap<String, f64>,
    pub version: u32,
}

impl From<&CooldownLedger> for LedgerFile {
    fn from(ledger: &CooldownLedger) -> Self {
        Self {
            last_searched: ledger.entries().clone(),
            version: LEDGER_VERSION,
        }
    }
}

/// Trait for ledger storage backends.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Load the ledger. Never fails: unreadable storage yields an empty ledger.
    async fn load(&self) -> CooldownLedger;

    /// Persist the ledger atomically.
    async fn save(&self, ledger: &CooldownLedger) -> Result<()>;

    /// Where the ledger lives, for logs.
    fn location(&self) -> String;
}
