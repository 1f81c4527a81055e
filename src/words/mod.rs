mod lexicon;

use thiserror::Error;

pub use lexicon::{CRORE, HUNDRED, LAKH, THOUSAND, ZERO};

const CRORE_VALUE: u64 = 10_000_000;
const LAKH_VALUE: u64 = 100_000;
const THOUSAND_VALUE: u64 = 1_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordsError {
    #[error("negative amount {value} cannot be written in words")]
    Negative { value: i64 },
}

/// Writes a rupee amount in Hindi words using Indian grouping
/// (करोड़ | लाख | हज़ार | सौ | remainder).
///
/// Zero groups are skipped, so `100_050` reads "एक लाख पचास". Crore counts
/// above 99 are written by the same routine, which keeps the function total
/// over `u64`. No currency suffix is appended.
pub fn to_hindi_words(amount: u64) -> String {
    if amount == 0 {
        return ZERO.to_string();
    }
    let mut parts: Vec<&str> = Vec::new();
    push_groups(amount, &mut parts);
    parts.join(" ").trim().to_string()
}

/// Signed entry point used for computed balances.
pub fn amount_in_words(amount: i64) -> Result<String, WordsError> {
    if amount < 0 {
        return Err(WordsError::Negative { value: amount });
    }
    Ok(to_hindi_words(amount as u64))
}

/// Absent values read as zero.
pub fn optional_amount_in_words(amount: Option<u64>) -> String {
    to_hindi_words(amount.unwrap_or(0))
}

fn push_groups(amount: u64, parts: &mut Vec<&'static str>) {
    let crore = amount / CRORE_VALUE;
    let lakh = (amount / LAKH_VALUE) % 100;
    let thousand = (amount / THOUSAND_VALUE) % 100;
    let hundred = (amount / 100) % 10;
    let rest = amount % 100;

    if crore > 0 {
        if crore < 100 {
            parts.push(lexicon::word(crore));
        } else {
            push_groups(crore, parts);
        }
        parts.push(CRORE);
    }
    push_scaled(lakh, LAKH, parts);
    push_scaled(thousand, THOUSAND, parts);
    push_scaled(hundred, HUNDRED, parts);
    if rest > 0 {
        parts.push(lexicon::word(rest));
    }
}

fn push_scaled(group: u64, scale: &'static str, parts: &mut Vec<&'static str>) {
    if group == 0 {
        return;
    }
    parts.push(lexicon::word(group));
    parts.push(scale);
}
