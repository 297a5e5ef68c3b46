//! Input-side normalization: what the form does to text before the core sees it.
//!
//! - `sanitize`: pasted/typed text → digits and a single `.`, capped in length
//! - `apply_key`: one press on the on-screen keypad

use once_cell::sync::Lazy;
use regex::Regex;

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").expect("non-numeric regex"));

/// Comma → dot, drop everything except digits and `.`, keep only the first
/// `.`, cap at `max_len` characters.
pub fn sanitize(raw: &str, max_len: usize) -> String {
    let dotted = raw.replace(',', ".");
    let stripped = NON_NUMERIC.replace_all(&dotted, "");

    let mut out = String::with_capacity(max_len);
    let mut seen_dot = false;
    for ch in stripped.chars() {
        if ch == '.' {
            if seen_dot {
                continue;
            }
            seen_dot = true;
        }
        if out.len() >= max_len {
            break;
        }
        out.push(ch);
    }
    out
}

/// Keys on the on-screen keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Dot,
    Delete,
}

impl Key {
    /// Parse a keypad key name: `"0"`..`"9"`, `"."` or `"delete"`.
    pub fn parse(name: &str) -> Option<Key> {
        match name.trim() {
            "delete" | "del" | "backspace" => Some(Key::Delete),
            "." | "," => Some(Key::Dot),
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.to_digit(10).map(|d| Key::Digit(d as u8)),
                    _ => None,
                }
            }
        }
    }
}

/// Apply one keypad press to the current field text.
pub fn apply_key(current: &str, key: Key, max_len: usize) -> String {
    let mut out = current.to_string();
    match key {
        Key::Delete => {
            out.pop();
        }
        Key::Dot => {
            if !out.contains('.') && out.len() < max_len {
                out.push('.');
            }
        }
        Key::Digit(d) if d <= 9 => {
            if out.len() < max_len {
                out.push(char::from(b'0' + d));
            }
        }
        Key::Digit(_) => {}
    }
    out
}
