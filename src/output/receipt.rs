use itertools::Itertools;

use super::ReceiptRecord;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn quantity_rows(record: &ReceiptRecord) -> String {
    let mut out = String::new();
    for row in &record.rows {
        out.push_str(&format!(
            "          <tr><td class=\"strong\">{}</td><td class=\"mark\">{}</td><td class=\"strong\">{}</td><td class=\"mark\">{}</td></tr>\n",
            escape_html(&row.katta),
            escape_html(&row.marka1),
            escape_html(&row.theli),
            escape_html(&row.marka2),
        ));
    }
    out
}

fn calculation_rows(record: &ReceiptRecord) -> String {
    let rows = [
        ("वजन (टन)", record.weight_tons.as_str(), ""),
        ("रेट/टन", record.rate_per_ton.as_str(), ""),
        ("भाड़ा", record.freight.as_str(), ""),
        ("ईनाम", record.inam.as_str(), ""),
        ("पानी छंटाई", record.paani_chantai.as_str(), ""),
        ("कुल भाड़ा", record.total_freight.as_str(), " class=\"total\""),
        ("एडवान्स", record.advance.as_str(), ""),
    ];
    let mut out = String::new();
    for (label, value, class) in rows {
        out.push_str(&format!(
            "          <tr{class}><td>{label}</td><td>{}</td></tr>\n",
            escape_html(value)
        ));
    }
    out.push_str(&format!(
        "          <tr class=\"due\"><td>बाकी</td><td>₹ {}</td></tr>\n",
        escape_html(&record.balance)
    ));
    out
}

/// Single A6 receipt page (397×559 px) ready for the browser's print dialog.
pub fn render_html(record: &ReceiptRecord) -> Vec<u8> {
    let blessing = record
        .blessing
        .iter()
        .map(|l| escape_html(l))
        .join("<br/>");
    let contact = if record.contact.is_empty() {
        String::new()
    } else {
        format!(
            "<div class=\"contact\">संपर्क: {}</div>",
            escape_html(&record.contact)
        )
    };
    let remark = match &record.extra_remark {
        Some(r) => format!("<div class=\"remark\">विशेष: {}</div>", escape_html(r)),
        None => String::new(),
    };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="hi">
<head>
  <meta charset="utf-8"/>
  <title>बिल्टी {number}</title>
  <link href="https://fonts.googleapis.com/css2?family=Noto+Sans+Devanagari:wght@400;700;900&amp;display=swap" rel="stylesheet"/>
  <style>
    @page {{ size: A6 portrait; margin: 0; }}
    body {{ margin: 0; font-family: 'Noto Sans Devanagari', sans-serif; color: #0f172a; }}
    .sheet {{
      width: 397px; height: 559px; box-sizing: border-box; overflow: hidden;
      border: 2px solid #0c243c; padding: 16px; display: flex; flex-direction: column; background: #fff;
    }}
    .header {{ text-align: center; }}
    .blessing {{ font-size: 8px; font-weight: bold; line-height: 1.1; margin-bottom: 2px; }}
    h1 {{ margin: 0; color: #d32f2f; font-size: 24px; font-weight: 900; line-height: 1.1; }}
    .address {{ font-size: 9px; color: #0c243c; font-weight: 800; margin-top: 2px; line-height: 1.2; }}
    .contact {{ font-size: 8.5px; color: #475569; font-weight: 700; margin-top: 1px; border-bottom: 1px solid #e2e8f0; padding-bottom: 3px; }}
    .meta-row {{ display: flex; justify-content: space-between; margin-top: 4px; font-size: 9.5px; font-weight: bold; }}
    .number {{ color: #dc2626; font-weight: 900; }}
    .consignee {{ margin: 4px 0; border-bottom: 1px dotted #cbd5e1; padding-bottom: 2px; font-size: 10px; }}
    .consignee b {{ font-size: 11px; font-weight: 900; }}
    .tables {{ display: flex; gap: 12px; }}
    .tables > div {{ width: 50%; display: flex; flex-direction: column; }}
    .title-tag {{ font-size: 10px; font-weight: 900; color: #0c243c; margin-bottom: 1px; }}
    table {{ width: 100%; border-collapse: collapse; margin: 4px 0; font-size: 8.5px; }}
    th, td {{ border: 1px solid #0c243c; padding: 2px; text-align: center; vertical-align: middle; line-height: 1; height: 24px; overflow: hidden; }}
    thead tr, tr.total {{ background: #f1f5f9; font-weight: 900; }}
    td.strong {{ font-weight: 900; }}
    td.mark {{ font-size: 7px; font-style: italic; }}
    tr.due {{ background: #fef2f2; color: #b91c1c; font-weight: 900; font-size: 10px; }}
    .driver {{ margin-top: 4px; font-size: 8px; font-weight: bold; color: #64748b; }}
    .driver b {{ color: #0f172a; }}
    .words-label {{ font-size: 8px; font-weight: bold; color: #d97706; }}
    .words {{ font-size: 10.5px; font-weight: 900; color: #0c243c; font-style: italic; border-bottom: 1px solid #f1f5f9; min-height: 14px; }}
    .note {{ background: #fefce8; border: 1px solid #fef08a; border-radius: 4px; padding: 5px; margin: 4px 0; font-size: 8.5px; line-height: 1.4; }}
    .note u {{ font-weight: 900; text-decoration: none; border-bottom: 1px solid #94a3b8; padding: 0 4px; }}
    .note .inam {{ color: #dc2626; }}
    .remark {{ margin-top: 4px; font-size: 8px; color: #64748b; border-top: 1px solid #fde68a; font-style: italic; }}
    .signature {{ margin-top: auto; display: flex; justify-content: space-between; align-items: flex-end; padding-bottom: 8px; }}
    .signature small {{ display: block; font-size: 8px; font-weight: bold; color: #94a3b8; }}
    .signature b {{ display: block; font-size: 10.5px; margin-top: 4px; min-width: 110px; border-bottom: 1px dotted #cbd5e1; }}
    .signature .firm {{ text-align: right; }}
    .signature .firm b {{ border: none; font-size: 11px; }}
    .watermark {{ text-align: center; opacity: 0.3; font-size: 5px; letter-spacing: 0.3em; font-weight: 900; }}
  </style>
</head>
<body>
  <div class="sheet" id="bilty-{id}">
    <div class="header">
      <div class="blessing">{blessing}</div>
      <h1>{firm}</h1>
      <div class="address">{address}</div>
      {contact}
    </div>

    <div class="meta-row">
      <div>नम्बर: <span class="number">{number}</span></div>
      <div>दिनांक: {date}</div>
    </div>
    <div class="consignee">पाने वाला: <b>{consignee}</b></div>
    <div class="meta-row">
      <div>माल: <b>{item}</b></div>
      <div>गाड़ी नं.: <b>{vehicle}</b></div>
    </div>

    <div class="tables">
      <div>
        <div class="title-tag">मात्रा विवरण</div>
        <table>
          <thead><tr><th>कट्टा</th><th>मार्का</th><th>थैली</th><th>मार्का</th></tr></thead>
          <tbody>
{quantity}          <tr class="total"><td colspan="4">कुल नग: {total_items}</td></tr>
          </tbody>
        </table>
        <div class="driver">ड्राइवर मो.: <b>{mobile}</b></div>
      </div>
      <div>
        <div class="title-tag">गणना विवरण</div>
        <table>
          <tbody>
{calculation}          </tbody>
        </table>
      </div>
    </div>

    <div>
      <div class="words-label">अक्षरे रुपये :</div>
      <div class="words">{words}</div>
      <div class="note">
        <b>नोट :-</b> दिनांक <u>{note_date}</u> को <u>{note_time}</u> बजे पहुंचने पर
        <u class="inam">{note_inam}</u> रुपये ईनाम दे देना सा।
        {remark}
      </div>
    </div>

    <div class="signature">
      <div><small>लिखने वाला (हस्ताक्षर):</small><b>{writer}</b></div>
      <div class="firm"><small>वास्ते:</small><b>{firm}</b></div>
    </div>
    <div class="watermark">RAMPURA BILTY LOGISTICS SYSTEM • JODHPUR</div>
  </div>
</body>
</html>
"####,
        id = escape_html(&record.id),
        number = escape_html(&record.bilty_number),
        blessing = blessing,
        firm = escape_html(&record.firm_name),
        address = escape_html(&record.firm_address),
        contact = contact,
        date = escape_html(&record.date),
        consignee = escape_html(&record.consignee),
        item = escape_html(&record.item),
        vehicle = escape_html(&record.vehicle),
        quantity = quantity_rows(record),
        total_items = record.total_items,
        mobile = escape_html(&record.driver_mobile),
        calculation = calculation_rows(record),
        words = escape_html(&record.amount_in_words),
        note_date = escape_html(&record.note_date),
        note_time = escape_html(&record.note_time),
        note_inam = escape_html(&record.note_inam),
        remark = remark,
        writer = escape_html(&record.writer_name),
    );

    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bilty, Firm};
    use crate::output::{build_record, DEFAULT_AMOUNT_SUFFIX, RECEIPT_MARKING_ROWS};

    fn rendered(bilty: &Bilty) -> String {
        let record = build_record(bilty, &Firm::default_firm(), DEFAULT_AMOUNT_SUFFIX);
        String::from_utf8(render_html(&record)).unwrap()
    }

    #[test]
    fn page_is_fixed_a6() {
        let html = rendered(&Bilty::new("firm-1"));
        assert!(html.contains("size: A6"));
        assert!(html.contains("width: 397px; height: 559px"));
        assert!(html.contains("गहलोत एन्टरप्राईजेज"));
        assert!(html.contains("शून्य रुपये मात्र"));
    }

    #[test]
    fn quantity_table_has_six_rows() {
        let html = rendered(&Bilty::new("firm-1"));
        assert_eq!(html.matches("<td class=\"mark\">").count(), RECEIPT_MARKING_ROWS * 2);
    }

    #[test]
    fn user_text_is_escaped() {
        let mut b = Bilty::new("firm-1");
        b.consignee_name = "<script>alert('x')</script>".to_string();
        b.extra_remark = "A & B".to_string();
        let html = rendered(&b);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("विशेष: A &amp; B"));
    }
}
