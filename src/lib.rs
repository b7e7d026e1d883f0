pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod printer;
pub mod receipt;
pub mod sanitize;
pub mod schedule;
pub mod types;
pub mod utils;
pub mod workflow;

#[cfg(feature = "gui")]
pub mod event_handlers;
#[cfg(feature = "gui")]
pub mod ui_setup;

#[cfg(feature = "gui")]
pub mod ui {
    slint::include_modules!();
}
