use thiserror::Error;

/// Dollars charged per pound of laundry.
pub const RATE_PER_POUND: f64 = 1.5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeightError {
    #[error("weight {0:?} is not a number")]
    Unparsable(String),
    #[error("weight must be a finite number")]
    NotFinite,
    #[error("weight must be greater than zero, got {0}")]
    NonPositive(f64),
}

/// Full-precision price; rounding to cents is a display concern.
pub fn compute_price(weight_lbs: f64) -> f64 {
    weight_lbs * RATE_PER_POUND
}

pub fn parse_weight(raw: &str) -> Result<f64, WeightError> {
    let trimmed = raw.trim();
    let weight: f64 = trimmed
        .parse()
        .map_err(|_| WeightError::Unparsable(trimmed.to_string()))?;
    if !weight.is_finite() {
        return Err(WeightError::NotFinite);
    }
    if weight <= 0.0 {
        return Err(WeightError::NonPositive(weight));
    }
    Ok(weight)
}

/// Price shown next to the weight field while the clerk is still typing.
/// `None` blanks the field.
pub fn preview_price(raw: &str) -> Option<f64> {
    parse_weight(raw).ok().map(compute_price)
}
