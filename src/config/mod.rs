// Property store for MP4J - line-oriented key=value settings
// Two logical groups share one file and one reader: "general" holds UI and
// behavior settings, "keyed" holds the key-binding entries (key.*)

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Mandated header carried at the top of every generated properties file.
pub const HEADER_COMMENT: &[&str] = &[
    "Read the documentation in the program to understand how to modify the properties file!",
    "ALSO DO NOT REMOVE ANY OF THE PROPERTIES!!!",
];

const GENERAL_DEFAULTS: &[(&str, &str)] = &[
    ("gui.defaultTheme", "dark"),
    ("gui.splashScreen", "on"),
    ("user.musicFolder", "."),
    ("audio.volume", "0.7"),
    ("net.pingHost", "google.com"),
    ("net.pingPort", "80"),
    ("net.pingTimeoutMs", "3000"),
];

const KEYED_DEFAULTS: &[(&str, &str)] = &[
    ("key.playPause", "SPACE"),
    ("key.nextTrack", "N"),
    ("key.prevTrack", "P"),
    ("key.volumeUp", "PLUS"),
    ("key.volumeDown", "MINUS"),
];

const KEYED_PREFIX: &str = "key.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read properties file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed property at line {line}: {text:?}")]
    Malformed { line: usize, text: String },
    #[error("failed to serialize settings: {0}")]
    Dump(#[from] toml::ser::Error),
}

/// Resolved settings, defaults merged with whatever the file provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    general: BTreeMap<String, String>,
    keyed: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GENERAL_DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            keyed: KEYED_DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Settings {
    /// Loads settings from the properties file. A missing file is not an
    /// error: defaults are used and the file is regenerated with the header
    /// comment so the user has something to edit next time.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            info!(path = %path.display(), "properties file missing, regenerating defaults");
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Defaults first, then two passes through the shared reader so a
        // file that only lists some keys still resolves every known one.
        let mut settings = Self::default();
        for (key, value) in scan_group(&content, |k| !k.starts_with(KEYED_PREFIX))? {
            settings.general.insert(key, value);
        }
        for (key, value) in scan_group(&content, |k| k.starts_with(KEYED_PREFIX))? {
            settings.keyed.insert(key, value);
        }

        debug!(
            general = settings.general.len(),
            keyed = settings.keyed.len(),
            "properties loaded"
        );
        Ok(settings)
    }

    /// Writes the properties file: header comment, general group, blank
    /// line, keyed group.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut out = String::new();
        for line in HEADER_COMMENT {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
        for (key, value) in &self.general {
            out.push_str(&format!("{key}={value}\n"));
        }
        out.push('\n');
        for (key, value) in &self.keyed {
            out.push_str(&format!("{key}={value}\n"));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, out).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Looks a key up across both groups.
    pub fn get_prop(&self, key: &str) -> Option<&str> {
        if key.starts_with(KEYED_PREFIX) {
            self.keyed.get(key).map(String::as_str)
        } else {
            self.general.get(key).map(String::as_str)
        }
    }

    /// Overrides a single property in the right group.
    pub fn set_prop(&mut self, key: &str, value: &str) {
        let group = if key.starts_with(KEYED_PREFIX) {
            &mut self.keyed
        } else {
            &mut self.general
        };
        group.insert(key.to_string(), value.to_string());
    }

    pub fn theme_key(&self) -> &str {
        self.get_prop("gui.defaultTheme").unwrap_or("dark")
    }

    /// TOML dump of the resolved settings, for `--print-config`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Shared line reader behind both property groups. Blank lines and `#`
/// comments are skipped; anything else must be `key=value`.
fn scan_group(
    content: &str,
    belongs: impl Fn(&str) -> bool,
) -> Result<Vec<(String, String)>, ConfigError> {
    let mut pairs = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::Malformed {
                line: idx + 1,
                text: raw.to_string(),
            });
        };
        let key = key.trim();
        if belongs(key) {
            pairs.push((key.to_string(), value.trim().to_string()));
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_regenerates_defaults_with_header() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("Properties_doc.txt");

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.get_prop("gui.defaultTheme"), Some("dark"));
        assert_eq!(settings.get_prop("key.playPause"), Some("SPACE"));

        let written = std::fs::read_to_string(&path).unwrap();
        for line in HEADER_COMMENT {
            assert!(written.contains(line));
        }
        assert!(written.contains("gui.defaultTheme=dark"));
    }

    #[test]
    fn test_load_merges_file_over_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("Properties_doc.txt");
        std::fs::write(
            &path,
            "# user edited\ngui.defaultTheme=dracula\nkey.playPause=ENTER\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.get_prop("gui.defaultTheme"), Some("dracula"));
        assert_eq!(settings.get_prop("key.playPause"), Some("ENTER"));
        // Untouched keys keep their defaults
        assert_eq!(settings.get_prop("net.pingPort"), Some("80"));
        assert_eq!(settings.get_prop("key.nextTrack"), Some("N"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("Properties_doc.txt");
        std::fs::write(&path, "gui.defaultTheme=dark\nthis line has no equals\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("Properties_doc.txt");

        let mut settings = Settings::default();
        settings.set_prop("gui.defaultTheme", "nord");
        settings.save(&path).unwrap();

        let reloaded = Settings::load(&path).unwrap();
        assert_eq!(reloaded.get_prop("gui.defaultTheme"), Some("nord"));
    }

    #[test]
    fn test_unknown_key_is_none() {
        let settings = Settings::default();
        assert_eq!(settings.get_prop("gui.doesNotExist"), None);
    }

    #[test]
    fn test_toml_dump_lists_both_groups() {
        let dump = Settings::default().to_toml().unwrap();
        assert!(dump.contains("[general]"));
        assert!(dump.contains("[keyed]"));
    }
}
