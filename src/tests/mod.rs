use tempfile::tempdir;

use crate::freight::FreightSummary;
use crate::model::{Bilty, Firm, MarkingField};
use crate::output::{self, OutputFormat, DEFAULT_AMOUNT_SUFFIX};
use crate::store::Store;
use crate::words;

fn filled_bilty() -> Bilty {
    let mut b = Bilty::new("firm-1");
    b.bilty_number = "101".to_string();
    b.date = "2025-01-15".to_string();
    b.consignee_name = "महावीर ट्रेडिंग कं.".to_string();
    b.item_name = "जीरा".to_string();
    b.set_vehicle_number("rj19 gc 4521");
    b.update_marking(0, MarkingField::Katta, "120").unwrap();
    b.update_marking(0, MarkingField::Marka1, "MT").unwrap();
    b.update_marking(1, MarkingField::Theli, "30").unwrap();
    b.weight_tons = 25.0;
    b.rate_per_ton = 4_000.0;
    b.inam = 1_000.0;
    b.paani_chantai = 500.0;
    b.advance = 1_500.0;
    b
}

#[test]
fn balance_flows_from_form_into_receipt_words() {
    let b = filled_bilty();
    let summary = FreightSummary::compute(&b);
    assert_eq!(summary.balance_rupees(), Some(1_00_000));

    let record = output::build_record(&b, &Firm::default_firm(), DEFAULT_AMOUNT_SUFFIX);
    assert_eq!(record.balance, "1,00,000");
    assert_eq!(record.total_freight, "1,01,500");
    assert_eq!(record.amount_in_words, "एक लाख रुपये मात्र");
    assert_eq!(record.vehicle, "RJ19 GC 4521");
    assert_eq!(record.total_items, 150);
}

#[test]
fn saved_bilty_renders_the_same_after_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut store = Store::open(&path).unwrap();
    store.add_consignee("महावीर ट्रेडिंग कं.").unwrap();
    store.upsert_bilty(filled_bilty());
    store.save().unwrap();

    let reopened = Store::open(&path).unwrap();
    let bilty = reopened.find_bilty("101").unwrap();
    let firm = reopened.firm_for(bilty);
    let before = output::build_record(&filled_bilty(), &Firm::default_firm(), DEFAULT_AMOUNT_SUFFIX);
    let after = output::build_record(bilty, firm, DEFAULT_AMOUNT_SUFFIX);
    assert_eq!(
        output::render(&before, OutputFormat::Text),
        output::render(&after, OutputFormat::Text)
    );
}

#[test]
fn words_cover_every_group_size() {
    let cases = [
        (7_u64, "सात"),
        (70, "सत्तर"),
        (700, "सात सौ"),
        (7_000, "सात हज़ार"),
        (70_000, "सत्तर हज़ार"),
        (7_00_000, "सात लाख"),
        (70_00_000, "सत्तर लाख"),
        (7_00_00_000, "सात करोड़"),
        (70_00_00_000, "सत्तर करोड़"),
        (1_01_01_101, "एक करोड़ एक लाख एक हज़ार एक सौ एक"),
    ];
    for (amount, expected) in cases {
        assert_eq!(words::to_hindi_words(amount), expected, "amount {amount}");
    }
}

#[test]
fn words_are_safe_to_share_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| std::thread::spawn(move || words::to_hindi_words(12_345 + i)))
        .collect();
    let out: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(out[0], "बारह हज़ार तीन सौ पैंतालीस");
    assert_eq!(out[1], "बारह हज़ार तीन सौ छियालीस");
}

#[test]
fn exported_html_lands_at_numbered_file_name() {
    let dir = tempdir().unwrap();
    let b = filled_bilty();
    let record = output::build_record(&b, &Firm::default_firm(), DEFAULT_AMOUNT_SUFFIX);
    let path = dir
        .path()
        .join(output::export_file_name(&record.bilty_number, OutputFormat::Html));
    std::fs::write(&path, output::render(&record, OutputFormat::Html)).unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(path.ends_with("Rampura_Bilty_101.html"));
    assert!(html.contains("एक लाख रुपये मात्र"));
    assert!(html.contains("कुल नग: 150"));
}
