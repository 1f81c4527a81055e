pub const ZERO: &str = "शून्य";
pub const HUNDRED: &str = "सौ";
pub const THOUSAND: &str = "हज़ार";
pub const LAKH: &str = "लाख";
pub const CRORE: &str = "करोड़";

// Hindi numerals below one hundred do not compose from tens and units, so every
// value has its own entry. Index 0 is unused.
const WORDS: [&str; 100] = [
    "",
    "एक", "दो", "तीन", "चार", "पांच", "छह", "सात", "आठ", "नौ", "दस",
    "ग्यारह", "बारह", "तेरह", "चौदह", "पंद्रह", "सोलह", "सत्रह", "अठारह", "उन्नीस", "बीस",
    "इक्कीस", "बाईस", "तेईस", "चौबीस", "पच्चीस", "छब्बीस", "सत्ताईस", "अट्ठाईस", "उनतीस", "तीस",
    "इकतीस", "बत्तीस", "तैंतीस", "चौंतीस", "पैंतीस", "छत्तीस", "सैंतीस", "अड़तीस", "उनतालीस", "चालीस",
    "इकतालीस", "बयालीस", "तैंतालीस", "चवालीस", "पैंतालीस", "छियालीस", "सैंतालीस", "अड़तालीस", "उनचास", "पचास",
    "इक्यावन", "बावन", "तिरेपन", "चौवन", "पचपन", "छप्पन", "सत्तावन", "अट्ठावन", "उनसठ", "साठ",
    "इकसठ", "बासठ", "तिरेसठ", "चौंसठ", "पैंसठ", "छियासठ", "सड़सठ", "अड़सठ", "उनहत्तर", "सत्तर",
    "इकहत्तर", "बहत्तर", "तिहत्तर", "चौहत्तर", "पचहत्तर", "छिहत्तर", "सतहत्तर", "अठहत्तर", "उन्यासी", "अस्सी",
    "इक्यासी", "बयासी", "तिरासी", "चौरासी", "पचासी", "छियासी", "सत्तासी", "अट्ठासी", "नवासी", "नब्बे",
    "इक्यानवे", "बानवे", "तिरानवे", "चौरानवे", "पचानवे", "छियानवे", "सत्तानवे", "अट्ठानवे", "निन्यानवे",
];

/// Word for `1..=99`. Callers never pass zero or larger values.
pub(super) fn word(value: u64) -> &'static str {
    debug_assert!((1..100).contains(&value));
    WORDS[value as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_entry_is_present_and_distinct() {
        let entries: HashSet<&str> = WORDS[1..].iter().copied().collect();
        assert_eq!(entries.len(), 99);
        assert!(WORDS[1..].iter().all(|w| !w.is_empty() && !w.contains(' ')));
    }

    #[test]
    fn round_tens_sit_at_their_index() {
        assert_eq!(word(10), "दस");
        assert_eq!(word(20), "बीस");
        assert_eq!(word(50), "पचास");
        assert_eq!(word(90), "नब्बे");
    }
}
