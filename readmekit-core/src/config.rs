//! Configuration management for readmekit

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::DEFAULT_FILENAME;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeVariant,
    pub catalog: CatalogConfig,
    pub export: ExportConfig,
    pub editor: EditorConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    pub fn toggled(self) -> Self {
        match self {
            ThemeVariant::Dark => ThemeVariant::Light,
            ThemeVariant::Light => ThemeVariant::Dark,
        }
    }
}

/// Where block templates come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Extra catalog file; its blocks override builtin ones with the same name
    pub path: Option<PathBuf>,
    pub include_builtin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub filename: String,
    /// How long export notices stay in the status bar
    pub notice_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub outline: bool,
    pub outline_width: u16,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            include_builtin: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            notice_ms: 1500,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: "$EDITOR".to_string(),
            args: vec!["{file}".to_string()],
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            outline: true,
            outline_width: 28,
        }
    }
}

impl Config {
    /// Get the platform-specific config file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "readmekit")
            .map(|proj_dirs| proj_dirs.config_dir().join("readmekit.toml"))
    }

    /// Load configuration from file, falling back to defaults if missing
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        // Check config file permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat config file: {}", path.display()))?;
            if metadata.permissions().mode() & 0o002 != 0 {
                anyhow::bail!(
                    "Config file {} is world-writable (insecure permissions)",
                    path.display()
                );
            }
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeVariant::Dark);
        assert!(config.catalog.include_builtin);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.export.filename, "README.md");
        assert_eq!(config.export.notice_ms, 1500);
        assert_eq!(config.editor.command, "$EDITOR");
        assert!(config.preview.outline);
    }

    #[test]
    fn test_load_valid_toml() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(
            b"theme = \"Light\"\n\
\n\
[catalog]\n\
path = \"/tmp/blocks.toml\"\n\
include_builtin = false\n\
\n\
[export]\n\
filename = \"DOCS.md\"\n\
notice_ms = 500\n\
\n\
[editor]\n\
command = \"nvim\"\n\
args = [\"+{line}\", \"{file}\"]\n",
        )?;

        let config = Config::load_from(file.path())?;
        assert_eq!(config.theme, ThemeVariant::Light);
        assert_eq!(config.catalog.path, Some(PathBuf::from("/tmp/blocks.toml")));
        assert!(!config.catalog.include_builtin);
        assert_eq!(config.export.filename, "DOCS.md");
        assert_eq!(config.export.notice_ms, 500);
        assert_eq!(config.editor.command, "nvim");
        assert_eq!(config.editor.args.len(), 2);
        Ok(())
    }

    #[test]
    fn test_load_partial_toml() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"[export]\nnotice_ms = 3000\n")?;

        let config = Config::load_from(file.path())?;
        assert_eq!(config.theme, ThemeVariant::Dark);
        assert_eq!(config.export.notice_ms, 3000);
        assert_eq!(config.export.filename, "README.md");
        assert!(config.catalog.include_builtin);
        Ok(())
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"invalid toml [[[syntax").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_world_writable_config_is_refused() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new()?;
        file.write_all(b"theme = \"Dark\"\n")?;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o666))?;

        assert!(Config::load_from(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_config_path_returns_some() {
        if let Some(p) = Config::config_path() {
            assert!(p.to_string_lossy().ends_with("readmekit.toml"));
        }
    }

    #[test]
    fn test_theme_toggle_and_serialization() -> Result<()> {
        assert_eq!(ThemeVariant::Dark.toggled(), ThemeVariant::Light);

        let config = Config {
            theme: ThemeVariant::Light,
            ..Default::default()
        };

        let toml_str = toml::to_string(&config)?;
        assert!(toml_str.contains("Light"));

        let parsed: Config = toml::from_str(&toml_str)?;
        assert_eq!(parsed.theme, ThemeVariant::Light);
        Ok(())
    }
}
