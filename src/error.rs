//! Everything that can stop a download before "Finished" is printed.
use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no URL specified")]
    NoUrl,

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("status: {}", status_text(.0))]
    Status(StatusCode),

    #[error("cannot derive a file name from {0}")]
    NoFileName(String),

    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Allocation(#[source] io::Error),

    #[error("transfer failed: {0}")]
    Copy(#[source] io::Error),

    #[error("transfer incomplete: expected {expected} bytes, received {received}")]
    Incomplete { expected: u64, received: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DownloadError>;

/// `404 Not Found`, or just the code when it has no registered reason.
fn status_text(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
