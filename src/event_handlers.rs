use std::cell::RefCell;
use std::rc::Rc;

use slint::ComponentHandle;
use tracing::warn;

use crate::db::Ledger;
use crate::pricing::preview_price;
use crate::types::{CustomerStatus, PhoneLookup};
use crate::ui_setup::{clear_customer_messages, clear_form};
use crate::utils::{format_money, format_pickup, totals_label, visits_label};
use crate::workflow::{Clock, EntryWorkflow, NameAction, NamePrefill};

pub fn setup_event_handlers<L, C>(workflow: Rc<EntryWorkflow<L, C>>, ui: &crate::ui::MainWindow)
where
    L: Ledger + 'static,
    C: Clock + 'static,
{
    let ui_handle = ui.as_weak();
    let ui_handle_phone = ui_handle.clone();
    let ui_handle_weight = ui_handle.clone();
    let ui_handle_save = ui_handle.clone();

    let workflow_phone = workflow.clone();
    let workflow_save = workflow;

    let prefill = Rc::new(RefCell::new(NamePrefill::default()));
    let prefill_phone = prefill.clone();
    let prefill_save = prefill;

    ui.on_phone_edited(move |raw| {
        let Some(ui) = ui_handle_phone.upgrade() else {
            return;
        };
        match workflow_phone.on_phone_field_changed(&raw) {
            Ok(lookup) => {
                if lookup.digits != raw.as_str() {
                    ui.set_phone(lookup.digits.as_str().into());
                }
                let action = prefill_phone.borrow_mut().update(&lookup);
                match action {
                    NameAction::Fill(name) => ui.set_customer_name(name.as_str().into()),
                    NameAction::Clear => ui.set_customer_name("".into()),
                    NameAction::Keep => {}
                }
                show_lookup(&ui, &lookup);
            }
            Err(e) => {
                warn!(error = %e, "customer lookup failed");
                ui.set_error_message(format!("Error looking up customer: {}", e).into());
            }
        }
    });

    ui.on_weight_edited(move |raw| {
        if let Some(ui) = ui_handle_weight.upgrade() {
            let preview = preview_price(&raw).map(format_money).unwrap_or_default();
            ui.set_price_preview(preview.into());
        }
    });

    ui.on_save_entry(move |phone, name, weight| {
        let Some(ui) = ui_handle_save.upgrade() else {
            return;
        };
        match workflow_save.submit(&phone, &name, &weight) {
            Ok(entry) => {
                clear_form(&ui);
                prefill_save.borrow_mut().reset();
                ui.set_status_message(
                    format!(
                        "Saved receipt #{} for {}: ${}, ready {}",
                        entry.id,
                        entry.customer_name,
                        format_money(entry.price),
                        format_pickup(&entry.pickup_at)
                    )
                    .into(),
                );
            }
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "entry not saved");
                ui.set_error_message(format!("{}. Please try again.", e).into());
            }
            // Form keeps its values so the clerk can fix them.
            Err(e) => ui.set_error_message(e.to_string().into()),
        }
    });
}

fn show_lookup(ui: &crate::ui::MainWindow, lookup: &PhoneLookup) {
    ui.set_error_message("".into());
    match &lookup.status {
        CustomerStatus::Incomplete => clear_customer_messages(ui),
        CustomerStatus::NewCustomer => {
            clear_customer_messages(ui);
            ui.set_status_message("New customer".into());
        }
        CustomerStatus::Returning(summary) => {
            ui.set_status_message("".into());
            ui.set_totals_message(totals_label(summary).into());
            ui.set_visits_message(visits_label(summary.visit_count).into());
        }
    }
}
