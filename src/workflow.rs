use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::db::{Entry, Ledger, NewEntry};
use crate::error::EntryError;
use crate::pricing::parse_weight;
use crate::printer::ReceiptSink;
use crate::sanitize::{PHONE_DIGITS, is_complete_phone, sanitize_name, sanitize_phone};
use crate::types::{CustomerStatus, PhoneLookup, Receipt};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Form input that passed validation, in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInput {
    pub phone: String,
    pub customer_name: String,
    pub weight_lbs: f64,
}

/// Checks phone, then name, then weight, and reports the first problem.
pub fn validate_input(
    phone_raw: &str,
    name_raw: &str,
    weight_raw: &str,
) -> Result<ValidInput, EntryError> {
    let phone = sanitize_phone(phone_raw);
    if phone.len() != PHONE_DIGITS {
        return Err(EntryError::InvalidPhone {
            digits: phone.len(),
        });
    }

    let customer_name = sanitize_name(name_raw).trim().to_string();
    if customer_name.is_empty() {
        return Err(EntryError::InvalidName);
    }

    let weight_lbs = parse_weight(weight_raw)?;

    Ok(ValidInput {
        phone,
        customer_name,
        weight_lbs,
    })
}

/// One kiosk's drop-off counter: validates form input, stores the entry and
/// passes it on for printing.
pub struct EntryWorkflow<L, C = SystemClock> {
    ledger: L,
    clock: C,
    tz: Tz,
    receipts: Box<dyn ReceiptSink>,
}

impl<L: Ledger> EntryWorkflow<L, SystemClock> {
    pub fn new(ledger: L, tz: Tz, receipts: impl ReceiptSink + 'static) -> Self {
        Self::with_clock(ledger, SystemClock, tz, receipts)
    }
}

impl<L: Ledger, C: Clock> EntryWorkflow<L, C> {
    pub fn with_clock(ledger: L, clock: C, tz: Tz, receipts: impl ReceiptSink + 'static) -> Self {
        Self {
            ledger,
            clock,
            tz,
            receipts: Box::new(receipts),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Saves one drop-off.
    ///
    /// On success the entry is already in the ledger and its receipt has
    /// been queued; printing problems never turn a save into an error. On
    /// any error nothing was written.
    pub fn submit(
        &self,
        phone_raw: &str,
        name_raw: &str,
        weight_raw: &str,
    ) -> Result<Entry, EntryError> {
        let input = validate_input(phone_raw, name_raw, weight_raw)?;

        let dropoff = self.clock.now().with_timezone(&self.tz);
        let new_entry = NewEntry::new(
            input.phone,
            input.customer_name,
            input.weight_lbs,
            dropoff,
        );

        let id = self.ledger.append(&new_entry)?;
        let entry = new_entry.into_entry(id);
        info!(
            entry_id = entry.id,
            weight_lbs = entry.weight_lbs,
            price = entry.price,
            pickup_at = %entry.pickup_at,
            "entry saved"
        );

        self.receipts.dispatch(Receipt::from(&entry));
        Ok(entry)
    }

    /// Live lookup for the phone field. Read-only; safe to call on every
    /// keystroke.
    pub fn on_phone_field_changed(&self, phone_raw: &str) -> Result<PhoneLookup, EntryError> {
        let digits = sanitize_phone(phone_raw);
        if !is_complete_phone(&digits) {
            return Ok(PhoneLookup {
                digits,
                status: CustomerStatus::Incomplete,
            });
        }

        let summary = self.ledger.summarize(&digits)?;
        debug!(visits = summary.visit_count, "customer lookup");
        let status = if summary.visit_count == 0 {
            CustomerStatus::NewCustomer
        } else {
            CustomerStatus::Returning(summary)
        };
        Ok(PhoneLookup { digits, status })
    }
}

/// What the form should do with the name field after a phone lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameAction {
    Keep,
    Fill(String),
    Clear,
}

/// Tracks whether the name field currently holds a name that a lookup put
/// there, so it can be taken back when the phone number changes.
///
/// A name the clerk typed is never touched.
#[derive(Debug, Clone, Default)]
pub struct NamePrefill {
    filled_for: Option<String>,
}

impl NamePrefill {
    pub fn update(&mut self, lookup: &PhoneLookup) -> NameAction {
        if let CustomerStatus::Returning(summary) = &lookup.status
            && let Some(name) = &summary.last_known_name
        {
            if self.filled_for.as_deref() == Some(lookup.digits.as_str()) {
                return NameAction::Keep;
            }
            self.filled_for = Some(lookup.digits.clone());
            return NameAction::Fill(name.clone());
        }

        match self.filled_for.take() {
            Some(_) => NameAction::Clear,
            None => NameAction::Keep,
        }
    }

    /// Forgets the last fill; call when the form is cleared.
    pub fn reset(&mut self) {
        self.filled_for = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CustomerSummary;
    use crate::pricing::WeightError;

    fn returning(digits: &str, name: &str) -> PhoneLookup {
        PhoneLookup {
            digits: digits.to_string(),
            status: CustomerStatus::Returning(CustomerSummary {
                visit_count: 1,
                total_weight: 4.0,
                total_price: 6.0,
                last_known_name: Some(name.to_string()),
            }),
        }
    }

    fn lookup(digits: &str, status: CustomerStatus) -> PhoneLookup {
        PhoneLookup {
            digits: digits.to_string(),
            status,
        }
    }

    #[test]
    fn prefilled_name_is_cleared_when_number_becomes_new_customer() {
        let mut prefill = NamePrefill::default();
        assert_eq!(
            prefill.update(&returning("4085551234", "Ana")),
            NameAction::Fill("Ana".to_string())
        );
        assert_eq!(
            prefill.update(&lookup("4085550000", CustomerStatus::NewCustomer)),
            NameAction::Clear
        );
        assert_eq!(
            prefill.update(&lookup("4085550001", CustomerStatus::NewCustomer)),
            NameAction::Keep
        );
    }

    #[test]
    fn prefilled_name_is_cleared_when_number_is_edited_short() {
        let mut prefill = NamePrefill::default();
        prefill.update(&returning("4085551234", "Ana"));
        assert_eq!(
            prefill.update(&lookup("408555123", CustomerStatus::Incomplete)),
            NameAction::Clear
        );
    }

    #[test]
    fn typed_name_survives_lookups() {
        let mut prefill = NamePrefill::default();
        assert_eq!(
            prefill.update(&lookup("408555", CustomerStatus::Incomplete)),
            NameAction::Keep
        );
        assert_eq!(
            prefill.update(&lookup("4085551234", CustomerStatus::NewCustomer)),
            NameAction::Keep
        );
    }

    #[test]
    fn repeat_lookup_of_same_number_keeps_edited_name() {
        let mut prefill = NamePrefill::default();
        prefill.update(&returning("4085551234", "Ana"));
        assert_eq!(
            prefill.update(&returning("4085551234", "Ana")),
            NameAction::Keep
        );
    }

    #[test]
    fn switching_returning_customers_refills() {
        let mut prefill = NamePrefill::default();
        prefill.update(&returning("4085551234", "Ana"));
        assert_eq!(
            prefill.update(&returning("4085550000", "Bo")),
            NameAction::Fill("Bo".to_string())
        );
    }

    #[test]
    fn reset_forgets_the_fill() {
        let mut prefill = NamePrefill::default();
        prefill.update(&returning("4085551234", "Ana"));
        prefill.reset();
        assert_eq!(
            prefill.update(&lookup("4085550000", CustomerStatus::NewCustomer)),
            NameAction::Keep
        );
        assert_eq!(
            prefill.update(&returning("4085551234", "Ana")),
            NameAction::Fill("Ana".to_string())
        );
    }

    #[test]
    fn input_is_sanitized() {
        let input = validate_input("(408) 555-1234 extra", " John O'Brien!! ", "10").unwrap();
        assert_eq!(
            input,
            ValidInput {
                phone: "4085551234".to_string(),
                customer_name: "John OBrien".to_string(),
                weight_lbs: 10.0,
            }
        );
    }

    #[test]
    fn short_phone_is_rejected_first() {
        let err = validate_input("555-1234", "", "abc").unwrap_err();
        assert!(matches!(err, EntryError::InvalidPhone { digits: 7 }));
        assert!(err.is_validation());
    }

    #[test]
    fn name_of_only_symbols_is_rejected() {
        let err = validate_input("4085551234", " 123 !! ", "10").unwrap_err();
        assert!(matches!(err, EntryError::InvalidName));
    }

    #[test]
    fn weight_errors_carry_the_reason() {
        let err = validate_input("4085551234", "Ana", "0").unwrap_err();
        assert!(matches!(
            err,
            EntryError::InvalidWeight(WeightError::NonPositive(_))
        ));
        assert!(!err.is_retryable());

        let err = validate_input("4085551234", "Ana", "heavy").unwrap_err();
        assert!(matches!(
            err,
            EntryError::InvalidWeight(WeightError::Unparsable(_))
        ));
    }
}
