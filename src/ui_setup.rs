use crate::config::KioskConfig;

pub fn initialize_ui(ui: &crate::ui::MainWindow, config: &KioskConfig) {
    ui.set_store_name(config.store_name.clone().into());
    ui.set_store_address(config.store_address.clone().into());
    clear_form(ui);
}

/// Empties every input and message, ready for the next customer.
pub fn clear_form(ui: &crate::ui::MainWindow) {
    ui.set_phone("".into());
    ui.set_customer_name("".into());
    ui.set_weight("".into());
    ui.set_price_preview("".into());
    clear_customer_messages(ui);
    ui.set_error_message("".into());
}

pub fn clear_customer_messages(ui: &crate::ui::MainWindow) {
    ui.set_status_message("".into());
    ui.set_totals_message("".into());
    ui.set_visits_message("".into());
}
