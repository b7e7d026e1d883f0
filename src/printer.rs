use std::path::Path;
use std::process::Command;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::KioskConfig;
use crate::receipt::ReceiptRenderer;
use crate::types::Receipt;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lp failed ({status}): {message}")]
    Spooler { status: String, message: String },
}

/// Sends a finished document to a physical printer.
pub trait Spooler {
    fn submit(&self, document: &Path) -> Result<(), PrintError>;
}

/// CUPS `lp` on a named destination.
#[derive(Debug, Clone)]
pub struct LpSpooler {
    printer: String,
    media: String,
}

impl LpSpooler {
    pub fn new(printer: impl Into<String>, media: impl Into<String>) -> Self {
        Self {
            printer: printer.into(),
            media: media.into(),
        }
    }

    pub fn from_config(config: &KioskConfig) -> Self {
        Self::new(&config.printer_name, &config.media)
    }

    fn command(&self, document: &Path) -> Command {
        let mut command = Command::new("lp");
        command
            .arg("-d")
            .arg(&self.printer)
            .arg("-o")
            .arg(format!("media={}", self.media))
            .arg(document);
        command
    }
}

impl Spooler for LpSpooler {
    fn submit(&self, document: &Path) -> Result<(), PrintError> {
        let output = self.command(document).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if !stderr.trim().is_empty() {
                stderr.trim().to_string()
            } else {
                stdout.trim().to_string()
            };
            return Err(PrintError::Spooler {
                status: output.status.to_string(),
                message,
            });
        }
        Ok(())
    }
}

/// Where the workflow hands a saved entry for printing. There is no way to
/// get a result back; failures stay with whoever does the printing.
pub trait ReceiptSink {
    fn dispatch(&self, receipt: Receipt);
}

/// Renders and spools receipts on a dedicated worker thread, one at a time,
/// in the order they were dispatched.
///
/// Dropping the queue closes it and waits for the receipts already queued.
pub struct PrintQueue {
    sender: Option<Sender<Receipt>>,
    worker: Option<JoinHandle<()>>,
}

impl PrintQueue {
    pub fn spawn<R, S>(renderer: R, spooler: S) -> Result<Self, PrintError>
    where
        R: ReceiptRenderer + Send + 'static,
        S: Spooler + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Receipt>();
        let worker = thread::Builder::new()
            .name("receipt-printer".to_string())
            .spawn(move || {
                for receipt in receiver {
                    print_receipt(&renderer, &spooler, &receipt);
                }
            })?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }
}

impl ReceiptSink for PrintQueue {
    fn dispatch(&self, receipt: Receipt) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(mpsc::SendError(receipt)) = sender.send(receipt) {
            warn!(entry_id = receipt.entry_id, "print worker is gone, receipt dropped");
        }
    }
}

impl Drop for PrintQueue {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("print worker panicked");
        }
    }
}

fn print_receipt<R, S>(renderer: &R, spooler: &S, receipt: &Receipt)
where
    R: ReceiptRenderer,
    S: Spooler,
{
    let result = renderer
        .render(receipt)
        .and_then(|path| spooler.submit(&path).map(|()| path));
    match result {
        Ok(path) => info!(
            entry_id = receipt.entry_id,
            path = %path.display(),
            "receipt sent to printer"
        ),
        Err(err) => warn!(
            entry_id = receipt.entry_id,
            error = %err,
            "receipt printing failed"
        ),
    }
}
