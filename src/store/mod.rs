//! Firm profiles, consignees and saved bilties in one JSON document. The
//! top-level keys are `rb_firms`, `rb_activeFirm`, `rb_consignees` and
//! `rb_history`.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Bilty, Firm};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store {path} is not valid JSON: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode store: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("firm not found: {id}")]
    FirmNotFound { id: String },

    #[error("cannot remove the only firm")]
    LastFirm,

    #[error("bilty not found: {key}")]
    BiltyNotFound { key: String },

    #[error("consignee name is empty")]
    EmptyConsignee,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct StoreData {
    #[serde(rename = "rb_firms")]
    pub firms: Vec<Firm>,
    #[serde(rename = "rb_activeFirm")]
    pub active_firm_id: String,
    #[serde(rename = "rb_consignees")]
    pub consignees: Vec<String>,
    #[serde(rename = "rb_history")]
    pub history: Vec<Bilty>,
}

impl Default for StoreData {
    fn default() -> Self {
        let firm = Firm::default_firm();
        Self {
            active_firm_id: firm.id.clone(),
            firms: vec![firm],
            consignees: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl StoreData {
    /// Decodes each key on its own so a damaged history does not take the
    /// firm profiles down with it.
    fn from_value(value: Value) -> Self {
        let mut data = StoreData::default();
        if let Some(firms) = value
            .get("rb_firms")
            .and_then(|v| serde_json::from_value::<Vec<Firm>>(v.clone()).ok())
        {
            if !firms.is_empty() {
                data.firms = firms;
            }
        }
        if let Some(id) = value.get("rb_activeFirm").and_then(Value::as_str) {
            data.active_firm_id = id.to_string();
        }
        if let Some(consignees) = value
            .get("rb_consignees")
            .and_then(|v| serde_json::from_value::<Vec<String>>(v.clone()).ok())
        {
            data.consignees = consignees;
        }
        match value.get("rb_history") {
            Some(Value::Array(entries)) => {
                data.history = entries
                    .iter()
                    .enumerate()
                    .filter_map(|(i, entry)| {
                        serde_json::from_value::<Bilty>(entry.clone())
                            .map_err(|e| log::warn!("skipping unreadable bilty #{i}: {e}"))
                            .ok()
                    })
                    .collect();
            }
            Some(other) if !other.is_null() => {
                log::warn!("discarding bilty history that is not a list")
            }
            _ => {}
        }
        data
    }
}

#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    data: StoreData,
}

impl Store {
    /// Opens the store at `path`; a missing file starts from defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => StoreData::default(),
            Ok(contents) => {
                let value: Value =
                    serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                        path: path.display().to_string(),
                        source,
                    })?;
                StoreData::from_value(value)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no store at {}, starting empty", path.display());
                StoreData::default()
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|source| StoreError::Encode { source })?;
        std::fs::write(&self.path, json).map_err(write_err)?;
        log::debug!("saved store to {}", self.path.display());
        Ok(())
    }

    pub fn firms(&self) -> &[Firm] {
        &self.data.firms
    }

    /// Active firm, or the first one when the stored id no longer matches.
    pub fn active_firm(&self) -> &Firm {
        self.firm(&self.data.active_firm_id)
            .unwrap_or(&self.data.firms[0])
    }

    pub fn firm(&self, id: &str) -> Option<&Firm> {
        self.data.firms.iter().find(|f| f.id == id)
    }

    /// Firm a bilty was written for, falling back to the active firm.
    pub fn firm_for(&self, bilty: &Bilty) -> &Firm {
        self.firm(&bilty.firm_id)
            .unwrap_or_else(|| self.active_firm())
    }

    pub fn add_firm(&mut self, mut firm: Firm) -> &Firm {
        if firm.id.trim().is_empty() || self.firm(&firm.id).is_some() {
            firm.id = self.next_firm_id();
        }
        self.data.firms.push(firm);
        let last = self.data.firms.len() - 1;
        &self.data.firms[last]
    }

    pub fn update_firm(&mut self, firm: Firm) -> Result<(), StoreError> {
        let slot = self
            .data
            .firms
            .iter_mut()
            .find(|f| f.id == firm.id)
            .ok_or_else(|| StoreError::FirmNotFound {
                id: firm.id.clone(),
            })?;
        *slot = firm;
        Ok(())
    }

    pub fn remove_firm(&mut self, id: &str) -> Result<Firm, StoreError> {
        let idx = self
            .data
            .firms
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| StoreError::FirmNotFound { id: id.to_string() })?;
        if self.data.firms.len() <= 1 {
            return Err(StoreError::LastFirm);
        }
        let removed = self.data.firms.remove(idx);
        if self.data.active_firm_id == removed.id {
            self.data.active_firm_id = self.data.firms[0].id.clone();
        }
        Ok(removed)
    }

    pub fn set_active_firm(&mut self, id: &str) -> Result<(), StoreError> {
        if self.firm(id).is_none() {
            return Err(StoreError::FirmNotFound { id: id.to_string() });
        }
        self.data.active_firm_id = id.to_string();
        Ok(())
    }

    fn next_firm_id(&self) -> String {
        let base = format!("firm-{}", Local::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.firm(&id).is_some() {
            id = format!("{base}-{n}");
            n += 1;
        }
        id
    }

    pub fn consignees(&self) -> &[String] {
        &self.data.consignees
    }

    /// Returns `false` when the name was already listed.
    pub fn add_consignee(&mut self, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyConsignee);
        }
        if self.data.consignees.iter().any(|c| c == name) {
            return Ok(false);
        }
        self.data.consignees.push(name.to_string());
        Ok(true)
    }

    pub fn remove_consignee(&mut self, name: &str) -> bool {
        let before = self.data.consignees.len();
        self.data.consignees.retain(|c| c != name.trim());
        before != self.data.consignees.len()
    }

    pub fn history(&self) -> &[Bilty] {
        &self.data.history
    }

    /// Replaces a saved bilty with the same id in place, otherwise puts the
    /// new one first. Returns `true` when an existing entry was replaced.
    pub fn upsert_bilty(&mut self, bilty: Bilty) -> bool {
        match self.data.history.iter().position(|b| b.id == bilty.id) {
            Some(idx) => {
                self.data.history[idx] = bilty;
                true
            }
            None => {
                self.data.history.insert(0, bilty);
                false
            }
        }
    }

    /// Looks up by id first, then by bilty number (newest match wins).
    pub fn find_bilty(&self, key: &str) -> Result<&Bilty, StoreError> {
        let key = key.trim();
        self.data
            .history
            .iter()
            .find(|b| b.id == key)
            .or_else(|| self.data.history.iter().find(|b| b.bilty_number == key))
            .ok_or_else(|| StoreError::BiltyNotFound {
                key: key.to_string(),
            })
    }

    pub fn remove_bilty(&mut self, key: &str) -> Result<Bilty, StoreError> {
        let id = self.find_bilty(key)?.id.clone();
        let idx = self
            .data
            .history
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::BiltyNotFound {
                key: key.to_string(),
            })?;
        Ok(self.data.history.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn bilty(id: &str, number: &str) -> Bilty {
        let mut b = Bilty::new("firm-1");
        b.id = id.to_string();
        b.bilty_number = number.to_string();
        b
    }

    #[test]
    fn missing_file_starts_with_default_firm() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.firms().len(), 1);
        assert_eq!(store.active_firm().id, "firm-1");
        assert!(store.history().is_empty());
        assert!(store.consignees().is_empty());
    }

    #[test]
    fn save_then_open_keeps_everything() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = Store::open(&path).unwrap();
        store.add_consignee("  श्याम ट्रेडर्स ").unwrap();
        store.upsert_bilty(bilty("a", "1"));
        store.save().unwrap();

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.data(), store.data());
        assert_eq!(reopened.consignees(), ["श्याम ट्रेडर्स".to_string()]);
    }

    #[test]
    fn upsert_replaces_in_place_or_prepends() {
        let dir = tempdir().unwrap();
        let mut store = Store::open(dir.path().join("s.json")).unwrap();
        assert!(!store.upsert_bilty(bilty("a", "1")));
        assert!(!store.upsert_bilty(bilty("b", "2")));
        let mut edited = bilty("a", "1");
        edited.consignee_name = "गोपाल".to_string();
        assert!(store.upsert_bilty(edited));

        let ids: Vec<_> = store.history().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(store.find_bilty("a").unwrap().consignee_name, "गोपाल");
        assert_eq!(store.find_bilty("2").unwrap().id, "b");
        assert!(matches!(
            store.find_bilty("zzz"),
            Err(StoreError::BiltyNotFound { .. })
        ));
    }

    #[test]
    fn null_amounts_and_bad_entries_do_not_drop_history() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(
            &path,
            r#"{"rb_history":[
                {"id":"a","biltyNumber":"1","weightTons":null,"ratePerTon":800},
                {"id":"b","biltyNumber":"2","weightTons":3,"ratePerTon":1000},
                {"id":"c","markings":"broken"}
            ]}"#,
        )
        .unwrap();
        let store = Store::open(&path).unwrap();
        assert_eq!(store.history().len(), 2);
        let a = store.find_bilty("a").unwrap();
        assert_eq!(a.weight_tons, 0.0);
        assert_eq!(a.rate_per_ton, 800.0);
        assert_eq!(store.find_bilty("2").unwrap().weight_tons, 3.0);
    }

    #[test]
    fn corrupt_history_falls_back_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(
            &path,
            r#"{"rb_consignees":["राम"],"rb_activeFirm":"firm-1","rb_history":"oops"}"#,
        )
        .unwrap();
        let store = Store::open(&path).unwrap();
        assert!(store.history().is_empty());
        assert_eq!(store.consignees(), ["राम".to_string()]);
        assert_eq!(store.firms().len(), 1);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Store::open(&path), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn firm_lifecycle_keeps_an_active_firm() {
        let dir = tempdir().unwrap();
        let mut store = Store::open(dir.path().join("s.json")).unwrap();
        let new_id = store.add_firm(Firm::blank(String::new())).id.clone();
        assert!(new_id.starts_with("firm-"));
        assert_ne!(new_id, "firm-1");

        store.set_active_firm(&new_id).unwrap();
        assert_eq!(store.active_firm().name, "नयी फर्म");
        store.remove_firm(&new_id).unwrap();
        assert_eq!(store.active_firm().id, "firm-1");

        assert!(matches!(store.remove_firm("firm-1"), Err(StoreError::LastFirm)));
        assert!(store.set_active_firm("nope").is_err());
    }

    #[test]
    fn unknown_active_firm_falls_back_to_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"rb_activeFirm":"gone"}"#).unwrap();
        let store = Store::open(&path).unwrap();
        assert_eq!(store.active_firm().id, "firm-1");
    }

    #[test]
    fn consignees_are_trimmed_and_deduplicated() {
        let dir = tempdir().unwrap();
        let mut store = Store::open(dir.path().join("s.json")).unwrap();
        assert!(store.add_consignee("राम").unwrap());
        assert!(!store.add_consignee(" राम ").unwrap());
        assert!(matches!(
            store.add_consignee("   "),
            Err(StoreError::EmptyConsignee)
        ));
        assert!(store.remove_consignee("राम"));
        assert!(!store.remove_consignee("राम"));
    }
}
