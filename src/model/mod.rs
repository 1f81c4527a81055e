use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const DEFAULT_MARKING_ROWS: usize = 4;

#[derive(Debug, Error)]
pub enum BiltyError {
    #[error("marking row {index} does not exist ({len} rows)")]
    MarkingIndex { index: usize, len: usize },

    #[error("a bilty keeps at least one marking row")]
    LastMarkingRow,

    #[error("unknown marking field '{value}', expected katta, marka1, theli or marka2")]
    UnknownMarkingField { value: String },

    #[error("failed to read draft {path}: {source}")]
    DraftRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse draft {path}: {message}")]
    DraftParse { path: String, message: String },

    #[error("failed to encode bilty {id} as yaml: {message}")]
    DraftEncode { id: String, message: String },
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Firm {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(alias = "leftPhones")]
    pub left_phones: String,
    #[serde(alias = "rightPhones")]
    pub right_phones: String,
    #[serde(alias = "leftName")]
    pub left_name: String,
    #[serde(alias = "rightName")]
    pub right_name: String,
    pub blessing: String,
}

impl Firm {
    pub fn default_firm() -> Self {
        Self {
            id: "firm-1".to_string(),
            name: "गहलोत एन्टरप्राईजेज".to_string(),
            address: "रामपुरा भाटियान, वाया-मथानिया जिला-जोधपुर (राज.)".to_string(),
            left_phones: "99286-46086, 70239-50491".to_string(),
            right_phones: "9166176829, 9929138244".to_string(),
            left_name: "अमृत भाई".to_string(),
            right_name: "केवल भाई".to_string(),
            blessing: "॥ श्री गणेशाय नमः ॥\n॥ श्री भोमियाजी कृपा ॥".to_string(),
        }
    }

    /// Blank profile for a newly added firm.
    pub fn blank(id: String) -> Self {
        Self {
            id,
            name: "नयी फर्म".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Marking {
    pub id: String,
    pub katta: String,
    pub marka1: String,
    pub theli: String,
    pub marka2: String,
}

impl Marking {
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        [&self.katta, &self.marka1, &self.theli, &self.marka2]
            .iter()
            .all(|v| v.trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkingField {
    Katta,
    Marka1,
    Theli,
    Marka2,
}

impl MarkingField {
    pub fn parse(value: &str) -> Result<Self, BiltyError> {
        match value.trim().to_lowercase().as_str() {
            "katta" | "कट्टा" => Ok(Self::Katta),
            "marka1" | "marka" => Ok(Self::Marka1),
            "theli" | "थैली" => Ok(Self::Theli),
            "marka2" => Ok(Self::Marka2),
            _ => Err(BiltyError::UnknownMarkingField {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum NotePeriod {
    #[serde(rename = "सुबह", alias = "morning")]
    Morning,
    #[default]
    #[serde(rename = "दोपहर", alias = "afternoon")]
    Afternoon,
    #[serde(rename = "शाम", alias = "evening")]
    Evening,
    #[serde(rename = "रात", alias = "night")]
    Night,
}

impl NotePeriod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "सुबह",
            Self::Afternoon => "दोपहर",
            Self::Evening => "शाम",
            Self::Night => "रात",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Bilty {
    pub id: String,
    #[serde(alias = "biltyNumber")]
    pub bilty_number: String,
    pub date: String,
    #[serde(alias = "consigneeName")]
    pub consignee_name: String,
    #[serde(alias = "itemName")]
    pub item_name: String,
    #[serde(alias = "vehicleNumber")]
    pub vehicle_number: String,
    #[serde(alias = "mobileNumber")]
    pub mobile_number: String,
    pub markings: Vec<Marking>,
    #[serde(alias = "weightTons", deserialize_with = "null_as_zero")]
    pub weight_tons: f64,
    #[serde(alias = "ratePerTon", deserialize_with = "null_as_zero")]
    pub rate_per_ton: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub inam: f64,
    #[serde(alias = "paaniChantai", deserialize_with = "null_as_zero")]
    pub paani_chantai: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub advance: f64,
    #[serde(alias = "noteDate")]
    pub note_date: String,
    #[serde(alias = "noteTime")]
    pub note_time: String,
    #[serde(alias = "notePeriod")]
    pub note_period: NotePeriod,
    #[serde(alias = "noteInam")]
    pub note_inam: String,
    #[serde(alias = "writerName")]
    pub writer_name: String,
    #[serde(alias = "extraRemark")]
    pub extra_remark: String,
    #[serde(alias = "firmId")]
    pub firm_id: String,
}

impl Bilty {
    /// Fresh draft for `firm_id`, dated today.
    pub fn new(firm_id: &str) -> Self {
        let now = Local::now();
        let today = now.format("%Y-%m-%d").to_string();
        Self {
            id: now.timestamp_millis().to_string(),
            bilty_number: "1".to_string(),
            date: today.clone(),
            markings: (1..=DEFAULT_MARKING_ROWS)
                .map(|i| Marking::blank(i.to_string()))
                .collect(),
            note_date: today,
            note_time: "14:05".to_string(),
            note_period: NotePeriod::Afternoon,
            firm_id: firm_id.to_string(),
            ..Self::default()
        }
    }

    pub fn add_marking_row(&mut self) {
        let id = Local::now().timestamp_millis().to_string();
        // Millisecond ids collide when rows are added in a tight loop.
        let id = if self.markings.iter().any(|m| m.id == id) {
            format!("{id}-{}", self.markings.len())
        } else {
            id
        };
        self.markings.push(Marking::blank(id));
    }

    pub fn remove_marking_row(&mut self, index: usize) -> Result<Marking, BiltyError> {
        if index >= self.markings.len() {
            return Err(BiltyError::MarkingIndex {
                index,
                len: self.markings.len(),
            });
        }
        if self.markings.len() <= 1 {
            return Err(BiltyError::LastMarkingRow);
        }
        Ok(self.markings.remove(index))
    }

    pub fn update_marking(
        &mut self,
        index: usize,
        field: MarkingField,
        value: &str,
    ) -> Result<(), BiltyError> {
        let len = self.markings.len();
        let row = self
            .markings
            .get_mut(index)
            .ok_or(BiltyError::MarkingIndex { index, len })?;
        let slot = match field {
            MarkingField::Katta => &mut row.katta,
            MarkingField::Marka1 => &mut row.marka1,
            MarkingField::Theli => &mut row.theli,
            MarkingField::Marka2 => &mut row.marka2,
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn set_vehicle_number(&mut self, value: &str) {
        self.vehicle_number = value.trim().to_uppercase();
    }

    /// Fills in what a hand-written draft file usually leaves out.
    pub fn normalize(&mut self, default_firm_id: &str) {
        let template = Bilty::new(default_firm_id);
        if self.id.trim().is_empty() {
            self.id = template.id;
        }
        if self.date.trim().is_empty() {
            self.date = template.date;
        }
        if self.note_date.trim().is_empty() {
            self.note_date = self.date.clone();
        }
        if self.note_time.trim().is_empty() {
            self.note_time = template.note_time;
        }
        if self.firm_id.trim().is_empty() {
            self.firm_id = default_firm_id.to_string();
        }
        if self.markings.is_empty() {
            self.markings = template.markings;
        }
        for (i, m) in self.markings.iter_mut().enumerate() {
            if m.id.trim().is_empty() {
                m.id = (i + 1).to_string();
            }
        }
        let vehicle = self.vehicle_number.clone();
        self.set_vehicle_number(&vehicle);
    }
}

// A cleared number input is saved as `null`.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

pub fn parse_draft(contents: &str, path: &str) -> Result<Bilty, BiltyError> {
    let lower = path.to_lowercase();
    if lower.ends_with(".json") {
        serde_json::from_str(contents).map_err(|e| BiltyError::DraftParse {
            path: path.to_string(),
            message: e.to_string(),
        })
    } else {
        serde_yaml::from_str(contents).map_err(|e| BiltyError::DraftParse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

pub fn load_draft(path: &Path) -> Result<Bilty, BiltyError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| BiltyError::DraftRead {
        path: display.clone(),
        source,
    })?;
    parse_draft(&contents, &display)
}

/// A saved bilty as an editable YAML draft. The id is kept so that saving
/// the draft again replaces the history entry.
pub fn bilty_to_yaml(bilty: &Bilty) -> Result<String, BiltyError> {
    serde_yaml::to_string(bilty).map_err(|e| BiltyError::DraftEncode {
        id: bilty.id.clone(),
        message: e.to_string(),
    })
}

/// Commented YAML draft written by `bilty template`.
pub fn draft_template_yaml(firm_id: &str) -> String {
    let draft = Bilty::new(firm_id);
    format!(
        r#"# Bilty draft
#
# Fill in the fields and run:
#   bilty new --from <this file> --save

bilty_number: "{number}"
date: "{date}"
consignee_name: ""
item_name: ""
vehicle_number: ""
mobile_number: ""

# One entry per row of the quantity table (कट्टा / मार्का / थैली / मार्का)
markings:
  - {{ katta: "", marka1: "", theli: "", marka2: "" }}
  - {{ katta: "", marka1: "", theli: "", marka2: "" }}
  - {{ katta: "", marka1: "", theli: "", marka2: "" }}
  - {{ katta: "", marka1: "", theli: "", marka2: "" }}

# Freight
weight_tons: 0
rate_per_ton: 0
inam: 0
paani_chantai: 0
advance: 0

# Note line: सुबह, दोपहर, शाम or रात
note_date: "{date}"
note_time: "{time}"
note_period: "{period}"
note_inam: ""

writer_name: ""
extra_remark: ""
firm_id: "{firm}"
"#,
        number = draft.bilty_number,
        date = draft.date,
        time = draft.note_time,
        period = draft.note_period.label(),
        firm = draft.firm_id,
    )
}
