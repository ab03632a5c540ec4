use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::TicketLogError;
use crate::models::{ScanRecord, ScanStatus};

/// JSON file holding every scan ever submitted, in arrival order.
///
/// Load-modify-save cycles are serialized within the process; separate
/// processes writing the same file still race (last writer wins).
#[derive(Debug)]
pub struct TicketLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TicketLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file: created with an empty list. Malformed file: treated as empty.
    pub fn load(&self) -> Result<Vec<ScanRecord>, TicketLogError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.save(&[])?;
                return Ok(vec![]);
            }
            Err(source) => {
                return Err(TicketLogError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Vec<ScanRecord>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "Ticket log is malformed, treating it as empty: {}", e
                );
                Ok(vec![])
            }
        }
    }

    /// Rewrites the whole file through a temp file + rename, so readers see
    /// either the old or the new list.
    pub fn save(&self, entries: &[ScanRecord]) -> Result<(), TicketLogError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let io_err = |source| TicketLogError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut ser =
                serde_json::Serializer::with_formatter(&mut tmp, PrettyFormatter::with_indent(b"    "));
            entries.serialize(&mut ser)?;
        }
        tmp.flush().map_err(io_err)?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// Appends one scan; returns the new number of entries.
    pub fn append(&self, entry: ScanRecord) -> Result<usize, TicketLogError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        entries.push(entry);
        self.save(&entries)?;
        Ok(entries.len())
    }

    /// Flips every entry to `not_scanned`; returns how many entries the log holds.
    pub fn reset_statuses(&self) -> Result<usize, TicketLogError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        for entry in &mut entries {
            entry.status = ScanStatus::NotScanned;
        }
        self.save(&entries)?;
        Ok(entries.len())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
