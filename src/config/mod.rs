use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "store_path")]
    pub store: Option<String>,
    pub output_dir: Option<String>,
    pub output_format: Option<String>,
    pub amount_suffix: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// `~/.bilty`, holding the config file and the default store.
pub fn config_dir() -> Option<PathBuf> {
    Some(home_dir()?.join(".bilty"))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.yml"))
}

pub fn default_store_path() -> PathBuf {
    config_dir()
        .map(|dir| dir.join("store.json"))
        .unwrap_or_else(|| PathBuf::from("bilty-store.json"))
}

/// Resolves a leading `~` against the home directory. Paths without one, or
/// with no home directory available, are used as given.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };
    match home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

/// Reads the YAML config. A missing file gives the defaults only when
/// `allow_missing` is set, so an explicit `--config` path must exist.
pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound && allow_missing => {
            return Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(format!("bilty config not found at '{}'", path.display()))
        }
        Err(e) => return Err(format!("cannot read bilty config '{}': {e}", path.display())),
    };
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents)
        .map_err(|e| format!("bad bilty config '{}': {e}", path.display()))
}

fn default_config_yaml() -> String {
    r#"# Bilty config
#
# Location (default):
#   ~/.bilty/config.yml

# Where firms, consignees and saved bilties are kept
store: ~/.bilty/store.json

# Export
# output_dir: ~/Documents/bilty
output_format: html

# Text printed after the balance in words
amount_suffix: "रुपये मात्र"

# Output styling
no_color: false
"#
    .to_string()
}

/// Writes the commented default config on first run. Returns whether a file
/// was written.
pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create '{}': {e}", dir.display()))?;
    }
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("cannot write default config '{}': {e}", path.display()))?;
    log::debug!("wrote default config to {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.store.as_deref(), Some("~/.bilty/store.json"));
        assert_eq!(cfg.output_format.as_deref(), Some("html"));
        assert_eq!(cfg.amount_suffix.as_deref(), Some("रुपये मात्र"));
        assert_eq!(cfg.no_color, Some(false));
    }

    #[test]
    fn missing_config_is_allowed_only_when_asked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        std::fs::write(&path, "no_color: true\n").unwrap();
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.no_color, Some(true));
    }

    #[test]
    fn empty_config_file_means_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "\n").unwrap();
        let cfg = load_config(&path, false).unwrap();
        assert!(cfg.store.is_none());
    }

    #[test]
    fn tilde_expands_only_as_a_prefix() {
        assert_eq!(expand_tilde("/tmp/s.json"), PathBuf::from("/tmp/s.json"));
        assert_eq!(expand_tilde("~user/s.json"), PathBuf::from("~user/s.json"));
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/s.json"), home.join("s.json"));
            assert_eq!(expand_tilde("~"), home);
        }
    }
}
