use chrono::{DateTime, FixedOffset};

use crate::db::{CustomerSummary, Entry};

/// What the receipt renderer gets for one saved drop-off.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub entry_id: i64,
    pub phone: String,
    pub customer_name: String,
    pub weight_lbs: f64,
    pub price: f64,
    pub dropoff_at: DateTime<FixedOffset>,
    pub pickup_at: DateTime<FixedOffset>,
}

impl From<&Entry> for Receipt {
    fn from(entry: &Entry) -> Self {
        Self {
            entry_id: entry.id,
            phone: entry.phone.clone(),
            customer_name: entry.customer_name.clone(),
            weight_lbs: entry.weight_lbs,
            price: entry.price,
            dropoff_at: entry.dropoff_at,
            pickup_at: entry.pickup_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerStatus {
    /// Fewer than ten digits typed so far.
    Incomplete,
    NewCustomer,
    Returning(CustomerSummary),
}

/// Result of a phone-field edit: the canonical digits to put back into the
/// field, plus who the customer is once the number is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneLookup {
    pub digits: String,
    pub status: CustomerStatus,
}
