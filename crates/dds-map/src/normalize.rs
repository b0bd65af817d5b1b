//! Text normalization shared by scoring and synonym lookup.

use std::collections::BTreeSet;

/// Normalizes text for comparison.
///
/// Lowercases, trims, replaces every run of non-alphanumeric characters with
/// a single space and collapses whitespace.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

/// Splits a name into lowercase word tokens, in order.
///
/// Boundaries are non-alphanumeric characters and lower-to-upper case
/// transitions, so `chargeCapacity` yields `charge`, `capacity`.
pub fn tokenize(raw: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(raw.len() + 8);
    let mut prev_lower = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if prev_lower && ch.is_uppercase() {
                spaced.push(' ');
            }
            spaced.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase();
        } else {
            spaced.push(' ');
            prev_lower = false;
        }
    }
    spaced.split_whitespace().map(str::to_string).collect()
}

pub fn token_set(raw: &str) -> BTreeSet<String> {
    tokenize(raw).into_iter().collect()
}

/// Space-padded phrase so substring checks only match whole tokens.
pub fn padded_phrase<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut phrase = String::from(" ");
    for token in tokens {
        phrase.push_str(token.as_ref());
        phrase.push(' ');
    }
    phrase
}
