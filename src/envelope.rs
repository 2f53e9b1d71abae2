//! Import/export codec.
//!
//! The full entity universe serializes into a versioned JSON envelope:
//!
//! ```json
//! { "version": 1, "timestamp": 1700000000000, "notes": [...], "folders": [...] }
//! ```
//!
//! Import validates the version and the payload shape before anything is
//! replaced; a rejected envelope leaves existing state untouched. A
//! successful import replaces both collections wholesale (no merge) and
//! does not touch entity timestamps.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{now_ms, Folder, Note, Result, TidyError, Universe};

/// The envelope version this build reads and writes.
pub const ENVELOPE_VERSION: u32 = 1;

/// The versioned export/import envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Format version, checked on import
    pub version: u32,
    /// When the export was taken (epoch milliseconds)
    pub timestamp: i64,
    pub notes: Vec<Note>,
    pub folders: Vec<Folder>,
}

impl Envelope {
    /// Captures the current universe into an envelope.
    pub fn export(universe: &Universe) -> Self {
        debug!(
            "Exporting {} notes and {} folders",
            universe.notes.len(),
            universe.folders.len()
        );
        Envelope {
            version: ENVELOPE_VERSION,
            timestamp: now_ms(),
            notes: universe.notes.clone(),
            folders: universe.folders.clone(),
        }
    }

    /// Serializes the envelope as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates an envelope from raw JSON.
    ///
    /// The version field is checked before the payload is decoded, so an
    /// envelope from a newer format fails with [`TidyError::UnsupportedVersion`]
    /// rather than a shape error about fields this build has never heard of.
    pub fn from_json(raw: &str) -> Result<Envelope> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
            warn!("Import rejected: not valid JSON ({})", e);
            TidyError::InvalidEnvelope {
                message: format!("not valid JSON: {}", e),
            }
        })?;

        let Some(version) = value.get("version").and_then(|v| v.as_u64()) else {
            warn!("Import rejected: missing or non-numeric version field");
            return Err(TidyError::InvalidEnvelope {
                message: "missing or non-numeric 'version' field".to_string(),
            });
        };

        if version != u64::from(ENVELOPE_VERSION) {
            warn!(
                "Import rejected: unsupported envelope version {} (expected {})",
                version, ENVELOPE_VERSION
            );
            return Err(TidyError::UnsupportedVersion {
                found: version as u32,
                expected: ENVELOPE_VERSION,
            });
        }

        let envelope: Envelope = serde_json::from_value(value).map_err(|e| {
            warn!("Import rejected: invalid payload shape ({})", e);
            TidyError::InvalidEnvelope {
                message: format!("invalid payload: {}", e),
            }
        })?;

        debug!(
            "Parsed envelope with {} notes and {} folders",
            envelope.notes.len(),
            envelope.folders.len()
        );
        Ok(envelope)
    }

    /// Consumes the envelope into a replacement universe.
    pub fn into_universe(self) -> Universe {
        Universe::new(self.notes, self.folders)
    }
}
