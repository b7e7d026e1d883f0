use slint::ComponentHandle;
use std::rc::Rc;

use laundromat::config::KioskConfig;
use laundromat::db::SqliteLedger;
use laundromat::printer::{LpSpooler, PrintQueue};
use laundromat::receipt::TextReceiptRenderer;
use laundromat::workflow::EntryWorkflow;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    laundromat::logging::init();

    let config = KioskConfig::load()?;
    let ledger = SqliteLedger::open(&config.database_path)?;
    let printer = PrintQueue::spawn(
        TextReceiptRenderer::from_config(&config),
        LpSpooler::from_config(&config),
    )?;
    let workflow = Rc::new(EntryWorkflow::new(ledger, config.tz()?, printer));
    tracing::info!(database = %config.database_path.display(), "kiosk starting");

    let ui = laundromat::ui::MainWindow::new()?;
    laundromat::ui_setup::initialize_ui(&ui, &config);
    laundromat::event_handlers::setup_event_handlers(workflow, &ui);

    ui.run()?;
    Ok(())
}
