use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::console::Console;
use crate::download::progress::TransferProgress;

/// Status line as printed by the reporter, carriage return included.
pub fn status_line(progress: &TransferProgress) -> String {
    match progress.total() {
        Some(_) => format!("\r{progress}"),
        None => format!("\rOn {progress}"),
    }
}

/// Background thread that prints the status line once per interval until
/// the transfer is marked done or the reporter is stopped.
pub struct Reporter {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<usize>>,
}

impl Reporter {
    pub fn spawn(
        progress: Arc<TransferProgress>,
        console: Console,
        interval: Duration,
    ) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("odm-reporter".into())
            .spawn(move || {
                let mut ticks = 0;
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if progress.is_done() {
                                break;
                            }
                            if let Err(e) = console.print(&status_line(&progress)) {
                                warn!("progress output failed: {e}");
                            }
                            ticks += 1;
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                ticks
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Wakes the thread and waits for it. Returns how many lines it printed.
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        drop(self.stop_tx.take());
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.join() {
            Ok(ticks) => {
                debug!(ticks, "reporter stopped");
                ticks
            }
            Err(_) => {
                warn!("reporter thread panicked");
                0
            }
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
