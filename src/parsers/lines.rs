use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Scans fail once this many lines in a row could not be decoded
pub const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// Scans that reach end of stream fail when more than this share of lines was skipped
pub const MAX_FAILURE_RATE: f64 = 0.5;

/// Per-scan bookkeeping for the skip-and-count policy on malformed lines
#[derive(Debug, Clone)]
pub struct LineTally {
    path: PathBuf,
    total_lines: usize,
    parsed: usize,
    skipped: usize,
    consecutive_errors: usize,
}

impl LineTally {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            total_lines: 0,
            parsed: 0,
            skipped: 0,
            consecutive_errors: 0,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn parsed(&self) -> usize {
        self.parsed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Decode one raw line
    ///
    /// Returns `Ok(None)` for blank lines and for lines that were skipped
    /// because they are not valid UTF-8 or failed to decode. Returns an error
    /// once the consecutive failure limit is hit.
    pub fn decode<'a, T>(&mut self, line_num: usize, line: &'a [u8]) -> StoreResult<Option<T>>
    where
        T: Deserialize<'a>,
    {
        let line = line.trim_ascii();
        if line.is_empty() {
            return Ok(None);
        }

        self.total_lines += 1;

        let text = match std::str::from_utf8(line) {
            Ok(text) => text,
            Err(e) => {
                self.skip(line_num, &e)?;
                return Ok(None);
            }
        };

        match serde_json::from_str::<T>(text) {
            Ok(value) => {
                self.parsed += 1;
                self.consecutive_errors = 0;
                Ok(Some(value))
            }
            Err(e) => {
                self.skip(line_num, &e)?;
                Ok(None)
            }
        }
    }

    fn skip(&mut self, line_num: usize, error: &dyn std::fmt::Display) -> StoreResult<()> {
        warn!(
            path = %self.path.display(),
            line = line_num,
            error = %error,
            "Skipping malformed line"
        );
        self.skipped += 1;
        self.consecutive_errors += 1;

        if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
            return Err(StoreError::MalformedSource {
                path: self.path.clone(),
                reason: format!(
                    "Too many consecutive parse errors ({}) - file may be corrupted",
                    self.consecutive_errors
                ),
            });
        }
        Ok(())
    }

    /// Check the end-of-stream failure rate and log a summary
    pub fn finish(&self) -> StoreResult<()> {
        if self.total_lines > 0 {
            let failure_rate = (self.skipped as f64) / (self.total_lines as f64);
            if failure_rate > MAX_FAILURE_RATE {
                return Err(StoreError::MalformedSource {
                    path: self.path.clone(),
                    reason: format!(
                        "Too many parse failures: {} of {} lines failed ({:.1}%)",
                        self.skipped,
                        self.total_lines,
                        failure_rate * 100.0
                    ),
                });
            }
        }

        if self.skipped > 0 {
            warn!(
                path = %self.path.display(),
                parsed = self.parsed,
                skipped = self.skipped,
                "Finished scan with skipped lines"
            );
        } else {
            debug!(path = %self.path.display(), parsed = self.parsed, "Finished scan");
        }

        Ok(())
    }
}
