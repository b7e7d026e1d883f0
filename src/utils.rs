use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::db::CustomerSummary;

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn format_weight(pounds: f64) -> String {
    format!("{:.2}", pounds)
}

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_pickup<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%A %Y-%m-%d %H:%M").to_string()
}

pub fn visits_label(visits: i64) -> String {
    format!(
        "Visits: {} time{}",
        visits,
        if visits == 1 { "" } else { "s" }
    )
}

pub fn totals_label(summary: &CustomerSummary) -> String {
    format!(
        "Total Weight: {} lbs | Total Price: ${}",
        format_weight(summary.total_weight),
        format_money(summary.total_price)
    )
}
