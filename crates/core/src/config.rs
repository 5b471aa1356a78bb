use crate::error::{Error, Result};
use crate::types::QuarantineKind;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_QUIET_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "m4a", "wma"];
pub const DEFAULT_PROTECTED_FOLDERS: &[&str] = &["albums", "playlists", "songs", "youtube-dl", "zips"];
pub const DEFAULT_INVALID_FOLDER: &str = "Invalid Files";
pub const DEFAULT_CORRUPT_FOLDER: &str = "Corrupt Files";

/// Raw TOML configuration structure.
/// Every field is optional; anything left out keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    quiet_interval_secs: Option<u64>,
    supported_extensions: Option<Vec<String>>,
    protected_folders: Option<Vec<String>>,
    #[serde(default)]
    quarantine: RawQuarantine,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawQuarantine {
    invalid_folder: Option<String>,
    corrupt_folder: Option<String>,
}

/// Engine configuration shared by every watched root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerConfig {
    pub quiet_interval: Duration,
    /// Lower-cased extensions without the leading dot
    pub supported_extensions: BTreeSet<String>,
    /// Lower-cased directory basenames the pruner never removes
    pub protected_folders: BTreeSet<String>,
    pub invalid_folder: String,
    pub corrupt_folder: String,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            quiet_interval: Duration::from_secs(DEFAULT_QUIET_INTERVAL_SECS),
            supported_extensions: to_lower_set(DEFAULT_SUPPORTED_EXTENSIONS.iter().copied()),
            protected_folders: to_lower_set(DEFAULT_PROTECTED_FOLDERS.iter().copied()),
            invalid_folder: DEFAULT_INVALID_FOLDER.to_string(),
            corrupt_folder: DEFAULT_CORRUPT_FOLDER.to_string(),
        }
    }
}

impl OrganizerConfig {
    pub fn is_supported_extension(&self, ext: &str) -> bool {
        self.supported_extensions.contains(&ext.to_lowercase())
    }

    pub fn is_protected(&self, basename: &str) -> bool {
        self.protected_folders.contains(&basename.to_lowercase())
    }

    pub fn quarantine_folder(&self, kind: QuarantineKind) -> &str {
        match kind {
            QuarantineKind::Invalid => &self.invalid_folder,
            QuarantineKind::Corrupt => &self.corrupt_folder,
        }
    }

    /// Override the quiet interval, rejecting zero
    pub fn with_quiet_interval_secs(mut self, secs: u64) -> Result<Self> {
        self.quiet_interval = parse_quiet_interval(secs)?;
        Ok(self)
    }
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OrganizerConfig> {
    let content = fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration from a string (useful for testing)
pub fn parse_config_str(content: &str) -> Result<OrganizerConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = OrganizerConfig::default();

    if let Some(secs) = raw.quiet_interval_secs {
        config.quiet_interval = parse_quiet_interval(secs)?;
    }

    if let Some(extensions) = raw.supported_extensions {
        let extensions: Vec<&str> = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.'))
            .collect();
        if extensions.iter().any(|e| e.is_empty()) {
            return Err(Error::ConfigParse(
                "Empty entry in 'supported_extensions'".to_string(),
            ));
        }
        config.supported_extensions = to_lower_set(extensions);
    }

    if let Some(folders) = raw.protected_folders {
        config.protected_folders = to_lower_set(folders.iter().map(String::as_str));
    }

    if let Some(name) = raw.quarantine.invalid_folder {
        config.invalid_folder = validate_folder_name(&name, "quarantine.invalid_folder")?;
    }
    if let Some(name) = raw.quarantine.corrupt_folder {
        config.corrupt_folder = validate_folder_name(&name, "quarantine.corrupt_folder")?;
    }

    Ok(config)
}

fn parse_quiet_interval(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(Error::ConfigParse(
            "quiet_interval_secs must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Quarantine folders live directly under the output root, so their names
/// must be a single plain path component.
fn validate_folder_name(name: &str, field_name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty folder name in '{}'",
            field_name
        )));
    }

    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => Ok(trimmed.to_string()),
        _ => Err(Error::ConfigParse(format!(
            "'{}' must be a single folder name, got '{}'",
            field_name, name
        ))),
    }
}

fn to_lower_set<'a>(items: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    items.into_iter().map(|s| s.trim().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrganizerConfig::default();
        assert_eq!(config.quiet_interval, Duration::from_secs(120));
        assert!(config.is_supported_extension("mp3"));
        assert!(config.is_supported_extension("M4A"));
        assert!(config.is_supported_extension("wma"));
        assert!(!config.is_supported_extension("flac"));
        assert!(config.is_protected("Playlists"));
        assert!(config.is_protected("youtube-dl"));
        assert!(!config.is_protected("Downloads"));
        assert_eq!(config.quarantine_folder(QuarantineKind::Invalid), "Invalid Files");
        assert_eq!(config.quarantine_folder(QuarantineKind::Corrupt), "Corrupt Files");
    }

    #[test]
    fn test_parse_empty_config_keeps_defaults() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config, OrganizerConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
quiet_interval_secs = 30
supported_extensions = [".MP3", "flac"]
protected_folders = ["Inbox"]

[quarantine]
invalid_folder = "Rejected"
corrupt_folder = "Broken"
        "#;

        let config = parse_config_str(toml).unwrap();
        assert_eq!(config.quiet_interval, Duration::from_secs(30));
        assert!(config.is_supported_extension("mp3"));
        assert!(config.is_supported_extension("flac"));
        assert!(!config.is_supported_extension("m4a"));
        assert!(config.is_protected("inbox"));
        assert!(!config.is_protected("albums"));
        assert_eq!(config.invalid_folder, "Rejected");
        assert_eq!(config.corrupt_folder, "Broken");
    }

    #[test]
    fn test_parse_rejects_zero_interval() {
        let result = parse_config_str("quiet_interval_secs = 0");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("greater than zero"));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        assert!(parse_config_str("genius_token = \"abc\"").is_err());
    }

    #[test]
    fn test_parse_rejects_nested_quarantine_folder() {
        let toml = r#"
[quarantine]
invalid_folder = "../elsewhere"
        "#;
        let result = parse_config_str(toml);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("quarantine.invalid_folder")
        );

        let toml = r#"
[quarantine]
corrupt_folder = "a/b"
        "#;
        assert!(parse_config_str(toml).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_extension() {
        let result = parse_config_str("supported_extensions = [\"mp3\", \" \"]");
        assert!(result.is_err());
    }

    #[test]
    fn test_with_quiet_interval_override() {
        let config = OrganizerConfig::default().with_quiet_interval_secs(5).unwrap();
        assert_eq!(config.quiet_interval, Duration::from_secs(5));
        assert!(OrganizerConfig::default().with_quiet_interval_secs(0).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shelver.toml");
        fs::write(&path, "quiet_interval_secs = 10\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.quiet_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_config(dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
