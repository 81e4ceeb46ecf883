// SPDX-License-Identifier: MIT
//! Background string scanning.
//!
//! Scans run on the tokio blocking pool against an immutable [`Bytes`]
//! snapshot, so the buffer stays free for edits while a scan is in flight.
//! Every submission bumps a generation counter; results that finish after
//! a newer submission are dropped by [`StringScanner::next_result`].

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use super::strings::find_strings;
use crate::buffer::ByteBuffer;
use crate::config::ScanConfig;
use crate::error::HexError;

/// Outcome of one scan
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub generation: u64,
    pub snapshot: Bytes,
    pub ranges: Vec<Range<usize>>,
}

impl ScanResult {
    /// Found strings decoded from the snapshot
    pub fn texts(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.ranges.iter().map(|r| {
            let text = String::from_utf8_lossy(&self.snapshot[r.clone()]).into_owned();
            (r.start, text)
        })
    }
}

pub struct StringScanner {
    config: ScanConfig,
    generation: Arc<AtomicU64>,
    delivered: u64,
    tx: mpsc::UnboundedSender<ScanResult>,
    rx: mpsc::UnboundedReceiver<ScanResult>,
}

impl StringScanner {
    pub fn new(config: ScanConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            generation: Arc::new(AtomicU64::new(0)),
            delivered: 0,
            tx,
            rx,
        }
    }

    /// Generation of the most recent submission (0 before any)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start scanning `snapshot`; must be called inside a tokio runtime.
    pub fn submit(&self, snapshot: Bytes) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let min_length = self.config.min_length;
        let latest = Arc::clone(&self.generation);
        let tx = self.tx.clone();

        tokio::task::spawn_blocking(move || {
            // Skip the work entirely if already superseded
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "scan superseded before start");
                return;
            }
            let ranges = find_strings(&snapshot, min_length);
            let _ = tx.send(ScanResult {
                generation,
                snapshot,
                ranges,
            });
        });
        generation
    }

    /// Snapshot the whole buffer and scan it
    pub fn submit_buffer(&self, buffer: &ByteBuffer) -> Result<u64, HexError> {
        let snapshot = buffer.snapshot(0, buffer.len())?;
        Ok(self.submit(snapshot))
    }

    /// Wait for the result of the latest submission.
    ///
    /// Results from older generations are discarded. Returns `None` when
    /// the latest submission has already been delivered, or nothing was
    /// submitted.
    pub async fn next_result(&mut self) -> Option<ScanResult> {
        if self.delivered == self.generation() {
            return None;
        }
        while let Some(result) = self.rx.recv().await {
            let latest = self.generation();
            if result.generation == latest {
                self.delivered = latest;
                return Some(result);
            }
            debug!(stale = result.generation, latest, "discarding stale scan result");
        }
        None
    }
}

impl Default for StringScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}
