// src/sanitize.rs
pub const PHONE_DIGITS: usize = 10;

/// Keeps the first ten digits of `raw`, dropping everything else.
///
/// The kiosk runs this on every keystroke, so it has to be idempotent:
/// feeding the output back in returns it unchanged.
pub fn sanitize_phone(raw: &str) -> String {
    let mut out = String::with_capacity(PHONE_DIGITS);
    for ch in raw.chars() {
        if out.len() == PHONE_DIGITS {
            break;
        }
        if ch.is_ascii_digit() {
            out.push(ch);
        }
    }
    out
}

/// Keeps ASCII letters and plain spaces. Leading/trailing spaces survive;
/// trimming happens at validation time.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphabetic() || ch == ' ' {
            out.push(ch);
        }
    }
    out
}

pub fn is_complete_phone(digits: &str) -> bool {
    digits.len() == PHONE_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
}
