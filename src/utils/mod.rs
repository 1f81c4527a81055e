use chrono::NaiveDate;

pub const DATE_PLACEHOLDER: &str = ".......................";
pub const FIELD_PLACEHOLDER: &str = "................";

/// Formats with Indian digit grouping: the last three digits, then pairs.
pub fn format_indian(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::new();
    if digits.len() > 3 {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let lead = head.len() % 2;
        if lead == 1 {
            out.push_str(&head[..1]);
        }
        for (i, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
            if i > 0 || lead == 1 {
                out.push(',');
            }
            out.push_str(std::str::from_utf8(pair).unwrap_or_default());
        }
        out.push(',');
        out.push_str(tail);
    } else {
        out.push_str(&digits);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

/// `YYYY-MM-DD` to `DD/MM/YYYY`; anything unparsable becomes the dotted blank.
pub fn format_receipt_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DATE_PLACEHOLDER.to_string();
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => DATE_PLACEHOLDER.to_string(),
    }
}

/// Parses a user-typed rupee amount.
///
/// Blank or non-numeric text yields `None` (read as zero). Fractions are floored.
pub fn parse_amount_text(value: &str) -> Result<Option<u64>, String> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '₹' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    let parsed: f64 = match cleaned.parse() {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };
    if !parsed.is_finite() {
        return Ok(None);
    }
    if parsed < 0.0 {
        return Err("amount must not be negative".to_string());
    }
    if parsed >= u64::MAX as f64 {
        return Err("amount is too large".to_string());
    }
    Ok(Some(parsed.floor() as u64))
}

pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Keeps a bilty number usable inside a file name.
pub fn file_name_component(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "1".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_indian_groups_in_pairs_after_thousands() {
        assert_eq!(format_indian(0), "0");
        assert_eq!(format_indian(999), "999");
        assert_eq!(format_indian(1_000), "1,000");
        assert_eq!(format_indian(12_345), "12,345");
        assert_eq!(format_indian(1_23_456), "1,23,456");
        assert_eq!(format_indian(12_34_567), "12,34,567");
        assert_eq!(format_indian(1_23_45_67_890), "1,23,45,67,890");
        assert_eq!(format_indian(-6_650), "-6,650");
    }

    #[test]
    fn receipt_dates_are_day_first() {
        assert_eq!(format_receipt_date("2024-03-09"), "09/03/2024");
        assert_eq!(format_receipt_date(""), DATE_PLACEHOLDER);
        assert_eq!(format_receipt_date("not a date"), DATE_PLACEHOLDER);
    }

    #[test]
    fn parse_amount_text_floors_and_defaults() {
        assert_eq!(parse_amount_text("12,345.90").unwrap(), Some(12_345));
        assert_eq!(parse_amount_text("₹ 500").unwrap(), Some(500));
        assert_eq!(parse_amount_text("").unwrap(), None);
        assert_eq!(parse_amount_text("abc").unwrap(), None);
        assert!(parse_amount_text("-10").is_err());
    }

    #[test]
    fn file_name_component_replaces_separators() {
        assert_eq!(file_name_component("12/A"), "12_A");
        assert_eq!(file_name_component("  "), "1");
    }
}
