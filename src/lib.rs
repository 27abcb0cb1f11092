pub mod config;
pub mod core;
pub mod download;
pub mod error;

pub use crate::config::Config;
pub use crate::core::console::Console;
pub use crate::core::manager::{DownloadStatus, DownloadSummary, Downloader, run};
pub use crate::error::DownloadError;
