pub mod receipt;

use serde::Serialize;

use crate::freight::FreightSummary;
use crate::model::{Bilty, Firm};
use crate::utils::{self, FIELD_PLACEHOLDER};
use crate::words;

/// Rows printed in the quantity table, regardless of how many were entered.
pub const RECEIPT_MARKING_ROWS: usize = 6;
pub const DEFAULT_AMOUNT_SUFFIX: &str = "रुपये मात्र";
const NEGATIVE_PREFIX: &str = "ऋण";
/// Shown in place of an amount whose whole rupees do not fit in an `i64`.
pub const OUT_OF_RANGE: &str = "सीमा से बाहर";
const OUT_OF_RANGE_WORDS: &str = "राशि सीमा से बाहर";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

pub fn export_file_name(bilty_number: &str, format: OutputFormat) -> String {
    format!(
        "Rampura_Bilty_{}.{}",
        utils::file_name_component(bilty_number),
        format.extension()
    )
}

/// Balance in words followed by `suffix`. A negative balance is written as
/// its magnitude behind "ऋण". An out-of-range balance gets a fixed notice
/// and no suffix.
pub fn balance_in_words(balance: Option<i64>, suffix: &str) -> String {
    let Some(balance) = balance else {
        return OUT_OF_RANGE_WORDS.to_string();
    };
    let body = match words::amount_in_words(balance) {
        Ok(text) => text,
        Err(_) => format!(
            "{NEGATIVE_PREFIX} {}",
            words::to_hindi_words(balance.unsigned_abs())
        ),
    };
    let suffix = suffix.trim();
    if suffix.is_empty() {
        body
    } else {
        format!("{body} {suffix}")
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReceiptRow {
    pub katta: String,
    pub marka1: String,
    pub theli: String,
    pub marka2: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReceiptRecord {
    pub id: String,
    pub blessing: Vec<String>,
    pub firm_name: String,
    pub firm_address: String,
    pub contact: String,
    pub bilty_number: String,
    pub date: String,
    pub consignee: String,
    pub item: String,
    pub vehicle: String,
    pub driver_mobile: String,
    pub rows: Vec<ReceiptRow>,
    pub total_items: i64,
    pub weight_tons: String,
    pub rate_per_ton: String,
    pub freight: String,
    pub inam: String,
    pub paani_chantai: String,
    pub total_freight: String,
    pub advance: String,
    pub balance: String,
    pub balance_rupees: Option<i64>,
    pub amount_in_words: String,
    pub note_date: String,
    pub note_time: String,
    pub note_inam: String,
    pub extra_remark: Option<String>,
    pub writer_name: String,
}

/// Grouped rupees, or the out-of-range notice.
pub fn display_rupees(value: Option<i64>) -> String {
    value
        .map(utils::format_indian)
        .unwrap_or_else(|| OUT_OF_RANGE.to_string())
}

fn plain_number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn contact_line(firm: &Firm) -> String {
    let right = firm.right_phones.trim();
    let left = firm.left_phones.trim();
    match (right.is_empty(), left.is_empty()) {
        (false, false) => format!("{right}, {left}"),
        (false, true) => right.to_string(),
        (true, false) => left.to_string(),
        (true, true) => String::new(),
    }
}

pub fn build_record(bilty: &Bilty, firm: &Firm, amount_suffix: &str) -> ReceiptRecord {
    let summary = FreightSummary::compute(bilty);
    let rows = (0..RECEIPT_MARKING_ROWS)
        .map(|i| match bilty.markings.get(i) {
            Some(m) => ReceiptRow {
                katta: m.katta.trim().to_string(),
                marka1: m.marka1.trim().to_string(),
                theli: m.theli.trim().to_string(),
                marka2: m.marka2.trim().to_string(),
            },
            None => ReceiptRow {
                katta: String::new(),
                marka1: String::new(),
                theli: String::new(),
                marka2: String::new(),
            },
        })
        .collect();
    let balance = summary.balance_rupees();

    ReceiptRecord {
        id: bilty.id.clone(),
        blessing: firm
            .blessing
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        firm_name: firm.name.clone(),
        firm_address: firm.address.clone(),
        contact: contact_line(firm),
        bilty_number: utils::or_placeholder(&bilty.bilty_number, "1").to_string(),
        date: utils::format_receipt_date(&bilty.date),
        consignee: bilty.consignee_name.trim().to_string(),
        item: utils::or_placeholder(&bilty.item_name, FIELD_PLACEHOLDER).to_string(),
        vehicle: utils::or_placeholder(&bilty.vehicle_number, FIELD_PLACEHOLDER).to_uppercase(),
        driver_mobile: utils::or_placeholder(&bilty.mobile_number, FIELD_PLACEHOLDER)
            .to_string(),
        rows,
        total_items: summary.total_items,
        weight_tons: plain_number(bilty.weight_tons),
        rate_per_ton: plain_number(bilty.rate_per_ton),
        freight: display_rupees(summary.freight_rupees()),
        inam: plain_number(bilty.inam),
        paani_chantai: plain_number(bilty.paani_chantai),
        total_freight: display_rupees(summary.total_freight_rupees()),
        advance: plain_number(bilty.advance),
        balance: display_rupees(balance),
        balance_rupees: balance,
        amount_in_words: balance_in_words(balance, amount_suffix),
        note_date: utils::format_receipt_date(&bilty.note_date),
        note_time: format!("{} {}", bilty.note_period.label(), bilty.note_time.trim())
            .trim()
            .to_string(),
        note_inam: utils::or_placeholder(&bilty.note_inam, "0").to_string(),
        extra_remark: Some(bilty.extra_remark.trim().to_string()).filter(|r| !r.is_empty()),
        writer_name: bilty.writer_name.trim().to_string(),
    }
}

pub fn render_text(record: &ReceiptRecord) -> Vec<u8> {
    let mut out = String::new();
    for line in &record.blessing {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&record.firm_name);
    out.push('\n');
    out.push_str(&record.firm_address);
    out.push('\n');
    if !record.contact.is_empty() {
        out.push_str(&format!("संपर्क: {}\n", record.contact));
    }
    out.push_str(&"-".repeat(48));
    out.push('\n');
    out.push_str(&format!(
        "नम्बर: {}    दिनांक: {}\n",
        record.bilty_number, record.date
    ));
    out.push_str(&format!("पाने वाला: {}\n", record.consignee));
    out.push_str(&format!(
        "माल: {}    गाड़ी नं.: {}\n",
        record.item, record.vehicle
    ));
    out.push('\n');
    out.push_str("कट्टा | मार्का | थैली | मार्का\n");
    for row in record.rows.iter().filter(|r| {
        !(r.katta.is_empty() && r.marka1.is_empty() && r.theli.is_empty() && r.marka2.is_empty())
    }) {
        out.push_str(&format!(
            "{} | {} | {} | {}\n",
            row.katta, row.marka1, row.theli, row.marka2
        ));
    }
    out.push_str(&format!("कुल नग: {}\n", record.total_items));
    out.push_str(&format!("ड्राइवर मो.: {}\n", record.driver_mobile));
    out.push('\n');
    for (label, value) in [
        ("वजन (टन)", record.weight_tons.as_str()),
        ("रेट/टन", record.rate_per_ton.as_str()),
        ("भाड़ा", record.freight.as_str()),
        ("ईनाम", record.inam.as_str()),
        ("पानी छंटाई", record.paani_chantai.as_str()),
        ("कुल भाड़ा", record.total_freight.as_str()),
        ("एडवान्स", record.advance.as_str()),
    ] {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out.push_str(&format!("बाकी: ₹ {}\n", record.balance));
    out.push_str(&format!("अक्षरे रुपये: {}\n", record.amount_in_words));
    out.push('\n');
    out.push_str(&format!(
        "नोट :- दिनांक {} को {} बजे पहुंचने पर {} रुपये ईनाम दे देना सा।\n",
        record.note_date,
        record.note_time,
        record.note_inam
    ));
    if let Some(remark) = &record.extra_remark {
        out.push_str(&format!("विशेष: {remark}\n"));
    }
    out.push('\n');
    out.push_str(&format!("लिखने वाला (हस्ताक्षर): {}\n", record.writer_name));
    out.push_str(&format!("वास्ते: {}\n", record.firm_name));
    out.into_bytes()
}

pub fn render_json(record: &ReceiptRecord) -> Vec<u8> {
    serde_json::to_vec_pretty(record).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(record: &ReceiptRecord) -> Vec<u8> {
    receipt::render_html(record)
}

pub fn render(record: &ReceiptRecord, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(record),
        OutputFormat::Json => render_json(record),
        OutputFormat::Html => render_html(record),
    }
}
