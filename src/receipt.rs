use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::config::KioskConfig;
use crate::printer::PrintError;
use crate::types::Receipt;
use crate::utils::{format_money, format_pickup, format_timestamp, format_weight};

const LINE_WIDTH: usize = 48;

/// Turns a saved drop-off into a printable document and returns its path.
pub trait ReceiptRenderer {
    fn render(&self, receipt: &Receipt) -> Result<PathBuf, PrintError>;
}

/// Plain-text receipt laid out for a monospace printer font.
#[derive(Debug, Clone)]
pub struct TextReceiptRenderer {
    output_dir: PathBuf,
    store_name: String,
    store_address: String,
}

impl TextReceiptRenderer {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        store_name: impl Into<String>,
        store_address: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            store_name: store_name.into(),
            store_address: store_address.into(),
        }
    }

    pub fn from_config(config: &KioskConfig) -> Self {
        Self::new(
            &config.receipt_dir,
            &config.store_name,
            &config.store_address,
        )
    }

    pub fn render_text(&self, receipt: &Receipt) -> String {
        let rule = "-".repeat(LINE_WIDTH);
        let lines = [
            centered(&self.store_name),
            centered(&self.store_address),
            String::new(),
            format!("Receipt #: {}", receipt.entry_id),
            format!("Date: {}", format_timestamp(&receipt.dropoff_at)),
            rule.clone(),
            format!("Phone Number: {}", receipt.phone),
            format!("Customer Name: {}", receipt.customer_name),
            String::new(),
            format!("Weight of Clothes (lbs): {}", format_weight(receipt.weight_lbs)),
            format!("Price ($): {}", format_money(receipt.price)),
            format!("Ready for pickup: {}", format_pickup(&receipt.pickup_at)),
            rule,
            String::new(),
            centered("Thank you for your business!"),
        ];
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

impl ReceiptRenderer for TextReceiptRenderer {
    fn render(&self, receipt: &Receipt) -> Result<PathBuf, PrintError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("receipt-{}.txt", receipt.entry_id));
        let mut file = File::create(&path)?;
        file.write_all(self.render_text(receipt).as_bytes())?;
        Ok(path)
    }
}

fn centered(text: &str) -> String {
    format!("{:^width$}", text, width = LINE_WIDTH)
        .trim_end()
        .to_string()
}
