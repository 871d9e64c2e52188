//! Quote Normalizer
//!
//! Turns whatever the provider printed (`<span>1,234,567</span>`, `۱۲۳۴۵۶۷`,
//! `1234567 ریال`) into `1,234,567`. Input without any digit is returned as is,
//! so sentinels survive untouched.

/// Thousands separator used in every rendered quote
pub const SEPARATOR: char = ',';

/// Normalize a raw quote into a thousands-grouped integer string
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter_map(ascii_digit).collect();
    if digits.is_empty() {
        return raw.to_string();
    }

    match digits.parse::<u64>() {
        Ok(value) => group_thousands(value),
        Err(_) => raw.to_string(),
    }
}

/// Map ASCII, Persian and Arabic-Indic digits to ASCII; anything else is dropped
fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '\u{06F0}'..='\u{06F9}' => char::from_digit(c as u32 - 0x06F0, 10),
        '\u{0660}'..='\u{0669}' => char::from_digit(c as u32 - 0x0660, 10),
        _ => None,
    }
}

fn group_thousands(value: u64) -> String {
    let plain = value.to_string();
    let mut out = String::with_capacity(plain.len() + plain.len() / 3);
    for (i, c) in plain.chars().enumerate() {
        if i > 0 && (plain.len() - i) % 3 == 0 {
            out.push(SEPARATOR);
        }
        out.push(c);
    }
    out
}
