use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::download::size::format_size;

const BAR_WIDTH: u64 = 10;

/// Byte counter for a single transfer.
///
/// Written by the copy loop, read by the reporter. Reads are relaxed: the
/// reporter may show a slightly stale figure, never a torn one.
#[derive(Debug)]
pub struct TransferProgress {
    total: Option<u64>,
    transferred: AtomicU64,
    done: AtomicBool,
}

impl TransferProgress {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total,
            transferred: AtomicU64::new(0),
            done: AtomicBool::new(false),
        }
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::Relaxed)
    }

    pub fn record_bytes(&self, bytes: u64) {
        self.transferred.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Returns `true` only for the call that flipped the flag.
    pub fn mark_done(&self) -> bool {
        !self.done.swap(true, Ordering::Release)
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Number of filled cells in the bar, clamped to the bar width.
    pub fn filled_cells(&self) -> Option<u64> {
        let total = self.total?;
        if total == 0 {
            return Some(BAR_WIDTH);
        }
        let cells = self.transferred() as u128 * BAR_WIDTH as u128 / total as u128;
        Some(cells.min(BAR_WIDTH as u128) as u64)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn sink(self: &Arc<Self>) -> ProgressSink {
        ProgressSink {
            progress: Arc::clone(self),
        }
    }
}

impl fmt::Display for TransferProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transferred = self.transferred();
        match (self.total, self.filled_cells()) {
            (Some(total), Some(filled)) => write!(
                f,
                "{}{} Downloaded {} of {}",
                "=".repeat(filled as usize),
                "-".repeat((BAR_WIDTH - filled) as usize),
                format_size(transferred),
                format_size(total),
            ),
            _ => write!(f, "Downloaded {}", format_size(transferred)),
        }
    }
}

/// Write half of the tee: counts what passes through and discards it.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    progress: Arc<TransferProgress>,
}

impl Write for ProgressSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.record_bytes(buf.len() as u64);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
