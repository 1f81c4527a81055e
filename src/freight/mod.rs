use serde::Serialize;

use crate::model::{Bilty, Marking};

/// Totals shown in the calculation table of a receipt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FreightSummary {
    pub total_katta: i64,
    pub total_theli: i64,
    pub total_items: i64,
    pub freight: f64,
    pub total_freight: f64,
    pub balance: f64,
}

impl FreightSummary {
    pub fn compute(bilty: &Bilty) -> Self {
        let total_katta = sum_counts(&bilty.markings, |m| &m.katta);
        let total_theli = sum_counts(&bilty.markings, |m| &m.theli);
        let freight = or_zero(bilty.weight_tons) * or_zero(bilty.rate_per_ton);
        let total_freight = freight + or_zero(bilty.inam) + or_zero(bilty.paani_chantai);
        let balance = total_freight - or_zero(bilty.advance);
        Self {
            total_katta,
            total_theli,
            total_items: total_katta.saturating_add(total_theli),
            freight,
            total_freight,
            balance,
        }
    }

    pub fn freight_rupees(&self) -> Option<i64> {
        floor_rupees(self.freight)
    }

    pub fn total_freight_rupees(&self) -> Option<i64> {
        floor_rupees(self.total_freight)
    }

    /// Whole rupees still due. Negative when the advance exceeds the freight,
    /// `None` when the amount does not fit in an `i64`.
    pub fn balance_rupees(&self) -> Option<i64> {
        floor_rupees(self.balance)
    }
}

fn or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
const RUPEES_MIN: f64 = i64::MIN as f64;
const RUPEES_MAX: f64 = i64::MAX as f64;

/// Floors to whole rupees. `None` when the value is outside the `i64` range.
pub fn floor_rupees(value: f64) -> Option<i64> {
    let floored = or_zero(value).floor();
    if (RUPEES_MIN..RUPEES_MAX).contains(&floored) {
        Some(floored as i64)
    } else {
        None
    }
}

/// Leading integer of a free-text count, `0` when there is none. Digit runs
/// too long for an `i64` saturate.
pub fn parse_count(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    digits[..end]
        .parse::<i64>()
        .map(|v| sign * v)
        .unwrap_or(sign * i64::MAX)
}

fn sum_counts<F>(markings: &[Marking], field: F) -> i64
where
    F: Fn(&Marking) -> &String,
{
    markings
        .iter()
        .map(|m| parse_count(field(m)))
        .fold(0_i64, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarkingField;

    fn sample() -> Bilty {
        let mut b = Bilty::new("firm-1");
        b.update_marking(0, MarkingField::Katta, "20").unwrap();
        b.update_marking(0, MarkingField::Theli, "5").unwrap();
        b.update_marking(1, MarkingField::Katta, "12 bags").unwrap();
        b.update_marking(2, MarkingField::Katta, "abc").unwrap();
        b.weight_tons = 10.5;
        b.rate_per_ton = 1_200.0;
        b.inam = 500.0;
        b.paani_chantai = 250.0;
        b.advance = 5_000.0;
        b
    }

    #[test]
    fn totals_follow_freight_formula() {
        let s = FreightSummary::compute(&sample());
        assert_eq!(s.total_katta, 32);
        assert_eq!(s.total_theli, 5);
        assert_eq!(s.total_items, 37);
        assert_eq!(s.freight, 12_600.0);
        assert_eq!(s.total_freight, 13_350.0);
        assert_eq!(s.balance, 8_350.0);
        assert_eq!(s.balance_rupees(), Some(8_350));
    }

    #[test]
    fn fractional_balance_is_floored() {
        let mut b = sample();
        b.weight_tons = 2.5;
        b.rate_per_ton = 1_001.0;
        b.inam = 0.0;
        b.paani_chantai = 0.0;
        b.advance = 0.0;
        let s = FreightSummary::compute(&b);
        assert_eq!(s.freight, 2_502.5);
        assert_eq!(s.freight_rupees(), Some(2_502));
        assert_eq!(s.balance_rupees(), Some(2_502));
    }

    #[test]
    fn advance_larger_than_freight_goes_negative() {
        let mut b = sample();
        b.advance = 20_000.0;
        assert_eq!(FreightSummary::compute(&b).balance_rupees(), Some(-6_650));
    }

    #[test]
    fn nan_inputs_count_as_zero() {
        let mut b = Bilty::new("firm-1");
        b.weight_tons = f64::NAN;
        b.rate_per_ton = 900.0;
        b.inam = 100.0;
        let s = FreightSummary::compute(&b);
        assert_eq!(s.freight, 0.0);
        assert_eq!(s.total_freight, 100.0);
    }

    #[test]
    fn totals_beyond_i64_are_not_floored_into_range() {
        let mut b = Bilty::new("firm-1");
        b.weight_tons = 1e10;
        b.rate_per_ton = 1e10;
        let s = FreightSummary::compute(&b);
        assert_eq!(s.freight_rupees(), None);
        assert_eq!(s.balance_rupees(), None);
        assert_eq!(floor_rupees(-1e20), None);
        assert_eq!(floor_rupees(9.0e18), Some(9_000_000_000_000_000_000));
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let mut b = Bilty::new("firm-1");
        b.update_marking(0, MarkingField::Katta, "9223372036854775807").unwrap();
        b.update_marking(1, MarkingField::Katta, "1").unwrap();
        b.update_marking(2, MarkingField::Theli, "5").unwrap();
        let s = FreightSummary::compute(&b);
        assert_eq!(s.total_katta, i64::MAX);
        assert_eq!(s.total_items, i64::MAX);
        assert_eq!(parse_count("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn counts_parse_leading_digits_only() {
        assert_eq!(parse_count("15"), 15);
        assert_eq!(parse_count(" 7 bags"), 7);
        assert_eq!(parse_count("-3"), -3);
        assert_eq!(parse_count("bags 7"), 0);
        assert_eq!(parse_count(""), 0);
    }
}
