//! Vault configuration
//! TOML file with per-field defaults; every field can be omitted

use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_target_url() -> String {
    "https://excalidraw.com".to_string()
}
fn default_drawings_key() -> String {
    "sketchvault_drawings".to_string()
}
fn default_folders_key() -> String {
    "sketchvault_folders".to_string()
}
fn default_inject_key() -> String {
    "sketchvault_drawing_to_inject".to_string()
}

/// Storage keys and the target page URL for one vault instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// URL prefix identifying the foreign drawing page.
    #[serde(default = "default_target_url")]
    pub target_url: String,
    /// Key holding the drawing collection.
    #[serde(default = "default_drawings_key")]
    pub drawings_key: String,
    /// Key holding the folder collection.
    #[serde(default = "default_folders_key")]
    pub folders_key: String,
    /// Reserved slot for the one-shot injection handoff.
    #[serde(default = "default_inject_key")]
    pub inject_key: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            drawings_key: default_drawings_key(),
            folders_key: default_folders_key(),
            inject_key: default_inject_key(),
        }
    }
}

impl VaultConfig {
    /// Load from a TOML file, falling back to defaults when the file is
    /// missing. A present-but-invalid file is an error, not a silent default.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: VaultConfig = toml::from_str("target_url = \"https://draw.example\"").unwrap();
        assert_eq!(config.target_url, "https://draw.example");
        assert_eq!(config.drawings_key, "sketchvault_drawings");
        assert_eq!(config.inject_key, "sketchvault_drawing_to_inject");
    }

    #[test]
    fn empty_toml_is_default() {
        let config: VaultConfig = toml::from_str("").unwrap();
        assert_eq!(config.target_url, VaultConfig::default().target_url);
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::load(&dir.path().join("vault.toml")).unwrap();
        assert_eq!(config.target_url, VaultConfig::default().target_url);
    }

    #[test]
    fn load_reads_file_and_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.toml");

        std::fs::write(&path, "target_url = \"https://draw.example\"").unwrap();
        let config = VaultConfig::load(&path).unwrap();
        assert_eq!(config.target_url, "https://draw.example");
        assert_eq!(config.drawings_key, "sketchvault_drawings");

        std::fs::write(&path, "target_url = [").unwrap();
        assert!(VaultConfig::load(&path).is_err());
    }
}
