use crate::config::Config;
use crate::core::console::Console;
use crate::download::file::{allocate, create_file, destination_path, write_stream_to_file};
use crate::download::progress::TransferProgress;
use crate::download::reporter::Reporter;
use crate::download::single::{build_client, fetch};
use crate::error::{DownloadError, Result};

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use reqwest::blocking::Client;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadStatus {
    Idle,
    RequestSent,
    HeadersReceived,
    FileCreated,
    Ready,
    Copying,
    Done,
    Failed(String),
}

impl DownloadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadStatus::Done | DownloadStatus::Failed(_))
    }
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadStatus::Idle => write!(f, "Idle"),
            DownloadStatus::RequestSent => write!(f, "RequestSent"),
            DownloadStatus::HeadersReceived => write!(f, "HeadersReceived"),
            DownloadStatus::FileCreated => write!(f, "FileCreated"),
            DownloadStatus::Ready => write!(f, "Ready"),
            DownloadStatus::Copying => write!(f, "Copying"),
            DownloadStatus::Done => write!(f, "Done"),
            DownloadStatus::Failed(reason) => write!(f, "Failed ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSummary {
    pub path: PathBuf,
    pub bytes: u64,
    pub total: Option<u64>,
    pub allocated: bool,
}

/// Drives one URL from request to "Finished".
pub struct Downloader {
    client: Client,
    config: Arc<Config>,
    console: Console,
    status: Mutex<DownloadStatus>,
}

impl Downloader {
    pub fn new(config: Config, console: Console) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self {
            client,
            config: Arc::new(config),
            console,
            status: Mutex::new(DownloadStatus::Idle),
        })
    }

    pub fn status(&self) -> DownloadStatus {
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_status(&self, status: DownloadStatus) {
        debug!(%status, "download state");
        *self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = status;
    }

    pub fn download(&self, url: &str) -> Result<DownloadSummary> {
        let result = self.transfer(url);
        if let Err(e) = &result {
            debug!(url, "download failed: {e}");
            self.set_status(DownloadStatus::Failed(e.to_string()));
        }
        result
    }

    fn transfer(&self, url: &str) -> Result<DownloadSummary> {
        self.set_status(DownloadStatus::RequestSent);
        let mut response = fetch(&self.client, url)?;
        self.set_status(DownloadStatus::HeadersReceived);

        let total = response.content_length();
        let path = destination_path(&self.config.output_dir, url)?;
        let mut file = create_file(&path)?;
        self.set_status(DownloadStatus::FileCreated);

        let allocated = match total {
            Some(len) if len > 0 => {
                allocate(&file, len)?;
                info!(path = %path.display(), len, "disk space allocated");
                self.console.println("Disk space allocated")?;
                true
            }
            _ => false,
        };
        self.set_status(DownloadStatus::Ready);

        let progress = Arc::new(TransferProgress::new(total));
        let reporter = Reporter::spawn(
            Arc::clone(&progress),
            self.console.clone(),
            self.config.report_interval(),
        )?;
        self.set_status(DownloadStatus::Copying);

        let copied = write_stream_to_file(
            &mut response,
            &mut file,
            &progress,
            self.config.buffer_size,
        );
        progress.mark_done();
        reporter.stop();
        if let Err(e) = self.console.println("") {
            debug!("failed to end the progress line: {e}");
        }

        let bytes = copied.map_err(DownloadError::Copy)?;
        if let Some(expected) = total {
            if bytes != expected {
                return Err(DownloadError::Incomplete {
                    expected,
                    received: bytes,
                });
            }
        }

        self.console.println("Finished")?;
        self.set_status(DownloadStatus::Done);
        info!(path = %path.display(), bytes, "download finished");

        Ok(DownloadSummary {
            path,
            bytes,
            total,
            allocated,
        })
    }
}

/// Entry point behind the binary. `args` excludes the program name; only the
/// first one is used.
pub fn run<I>(args: I, config: Config, console: Console) -> Result<DownloadSummary>
where
    I: IntoIterator<Item = String>,
{
    let url = args.into_iter().next().ok_or(DownloadError::NoUrl)?;
    let downloader = Downloader::new(config, console)?;
    downloader.download(&url)
}
