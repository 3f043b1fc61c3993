use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::trade::Trade;

/// Current on-disk ledger format version.
/// Version 2 carries over the `portfolio_trades_v2` namespace the ledger
/// has always been stored under.
pub const CURRENT_VERSION: u16 = 2;

/// On-disk shape of the trade ledger: a format version plus the ordered,
/// append-only trade list.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerDocument {
    version: u16,
    trades: Vec<Trade>,
}

/// Persistence for the trade ledger.
///
/// The ledger is an ordered, append-only log: trades are added at the end
/// and only ever removed in bulk via `clear_file`. A missing file is an
/// empty ledger; corrupt or future-versioned data is an error.
pub struct LedgerStore;

impl LedgerStore {
    /// Serialize a trade list to the versioned JSON document.
    pub fn to_json(trades: &[Trade]) -> Result<String, CoreError> {
        let doc = LedgerDocument {
            version: CURRENT_VERSION,
            trades: trades.to_vec(),
        };
        serde_json::to_string_pretty(&doc)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    /// Parse a ledger document, checking its format version.
    pub fn from_json(json: &str) -> Result<Vec<Trade>, CoreError> {
        let doc: LedgerDocument = serde_json::from_str(json)?;
        if doc.version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(doc.version));
        }
        Ok(doc.trades)
    }

    /// Load the ledger from a file on disk. A missing file is an empty
    /// ledger.
    pub fn load_from_file(path: &str) -> Result<Vec<Trade>, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the full ledger to a file on disk.
    pub fn save_to_file(path: &str, trades: &[Trade]) -> Result<(), CoreError> {
        let json = Self::to_json(trades)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Append a single trade and persist the updated ledger.
    pub fn append_to_file(path: &str, trade: Trade) -> Result<(), CoreError> {
        let mut trades = Self::load_from_file(path)?;
        trades.push(trade);
        Self::save_to_file(path, &trades)
    }

    /// Bulk-clear the ledger. Individual trades are never deleted.
    pub fn clear_file(path: &str) -> Result<(), CoreError> {
        Self::save_to_file(path, &[])
    }
}
