//! Configuration management for datatable-tui.
//!
//! Supports layered configuration: defaults → project → user → env

use crate::domain::{Demo, EditPolicy, UnknownIdPolicy};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File name of the per-project configuration
pub const PROJECT_CONFIG_FILE: &str = ".datatable-tui.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub table: TableConfig,
}

impl AppConfig {
    /// Load configuration with hierarchy: defaults → project → user → env
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_layers(ConfigLayers::discover(project_root))
    }

    /// Build configuration from explicit layers on top of the defaults
    pub fn from_layers(layers: ConfigLayers) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../default_config.toml"),
            FileFormat::Toml,
        ));

        for path in [layers.project_file, layers.user_file].into_iter().flatten() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(layers.env_vars),
        );

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ui.refresh_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "ui.refresh_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment variable prefix (`DATATABLE_TUI__UI__REFRESH_RATE_MS`)
pub const ENV_PREFIX: &str = "DATATABLE_TUI";

/// Sources layered over the built-in defaults, lowest priority first
#[derive(Debug, Default)]
pub struct ConfigLayers {
    /// `.datatable-tui.toml` in the project root
    pub project_file: Option<PathBuf>,
    /// `config.toml` in the user config directory
    pub user_file: Option<PathBuf>,
    /// Environment to read; `None` reads the process environment
    pub env_vars: Option<HashMap<String, String>>,
}

impl ConfigLayers {
    /// Existing config files for `project_root` and the current user
    pub fn discover(project_root: Option<&Path>) -> Self {
        let project_file = project_root
            .map(|root| root.join(PROJECT_CONFIG_FILE))
            .filter(|path| path.exists());

        let user_file = directories::ProjectDirs::from("com", "datatable-tui", "datatable-tui")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .filter(|path| path.exists());

        Self {
            project_file,
            user_file,
            env_vars: None,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// UI refresh rate in milliseconds
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,
    /// Enable vim-style navigation (j/k/h/l)
    #[serde(default = "default_vim_navigation")]
    pub vim_navigation: bool,
    /// Sample opened on start when no `--demo` or `--data` is given
    #[serde(default)]
    pub default_demo: Option<Demo>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate_ms(),
            vim_navigation: default_vim_navigation(),
            default_demo: None,
        }
    }
}

fn default_refresh_rate_ms() -> u64 {
    100
}

fn default_vim_navigation() -> bool {
    true
}

/// Table data and edit policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// JSON dataset shown alongside the built-in samples
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    /// Handling of drafts for rows that do not exist
    #[serde(default)]
    pub unknown_ids: UnknownIdPolicy,
    /// Reject drafts touching non-editable columns
    #[serde(default = "default_require_editable")]
    pub require_editable: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            unknown_ids: UnknownIdPolicy::default(),
            require_editable: default_require_editable(),
        }
    }
}

impl TableConfig {
    pub fn edit_policy(&self) -> EditPolicy {
        EditPolicy {
            unknown_ids: self.unknown_ids,
            require_editable: self.require_editable,
        }
    }
}

fn default_require_editable() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Layers with only `project_file` set and an empty environment
    fn project_layers(temp: &TempDir, contents: &str) -> ConfigLayers {
        let path = temp.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, contents).unwrap();
        ConfigLayers {
            project_file: Some(path),
            user_file: None,
            env_vars: Some(HashMap::new()),
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.ui.refresh_rate_ms, 100);
        assert!(config.ui.vim_navigation);
        assert!(config.ui.default_demo.is_none());
        assert!(config.table.dataset.is_none());
        assert_eq!(config.table.unknown_ids, UnknownIdPolicy::Ignore);
        assert!(config.table.require_editable);
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let layers = ConfigLayers {
            env_vars: Some(HashMap::new()),
            ..ConfigLayers::default()
        };
        let config = AppConfig::from_layers(layers).unwrap();
        assert_eq!(config.ui.refresh_rate_ms, 100);
        assert!(config.ui.vim_navigation);
        assert_eq!(config.table.unknown_ids, UnknownIdPolicy::Ignore);
    }

    #[test]
    fn test_project_config_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let layers = project_layers(
            &temp,
            "[table]\nunknown_ids = \"reject\"\ndataset = \"contacts.json\"\n\n[ui]\nvim_navigation = false\ndefault_demo = \"inline-edit\"\n",
        );

        let config = AppConfig::from_layers(layers).unwrap();
        assert_eq!(config.table.unknown_ids, UnknownIdPolicy::Reject);
        assert_eq!(config.table.dataset, Some(PathBuf::from("contacts.json")));
        assert!(!config.ui.vim_navigation);
        assert_eq!(config.ui.default_demo, Some(Demo::InlineEdit));
        assert_eq!(config.ui.refresh_rate_ms, 100);
    }

    #[test]
    fn test_user_file_overrides_project_and_env_overrides_both() {
        let temp = TempDir::new().unwrap();
        let mut layers = project_layers(&temp, "[ui]\nrefresh_rate_ms = 50\nvim_navigation = false\n");

        let user = temp.path().join("user.toml");
        std::fs::write(&user, "[ui]\nrefresh_rate_ms = 75\n").unwrap();
        layers.user_file = Some(user);
        layers.env_vars = Some(HashMap::from([(
            "DATATABLE_TUI__UI__VIM_NAVIGATION".to_string(),
            "true".to_string(),
        )]));

        let config = AppConfig::from_layers(layers).unwrap();
        assert_eq!(config.ui.refresh_rate_ms, 75);
        assert!(config.ui.vim_navigation);
    }

    #[test]
    fn test_zero_refresh_rate_rejected() {
        let temp = TempDir::new().unwrap();
        let layers = project_layers(&temp, "[ui]\nrefresh_rate_ms = 0\n");

        assert!(matches!(
            AppConfig::from_layers(layers),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_demo_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let layers = project_layers(&temp, "[ui]\ndefault_demo = \"spreadsheet\"\n");

        assert!(matches!(
            AppConfig::from_layers(layers),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_discover_skips_missing_project_file() {
        let temp = TempDir::new().unwrap();
        assert!(ConfigLayers::discover(Some(temp.path())).project_file.is_none());

        std::fs::write(temp.path().join(PROJECT_CONFIG_FILE), "").unwrap();
        assert_eq!(
            ConfigLayers::discover(Some(temp.path())).project_file,
            Some(temp.path().join(PROJECT_CONFIG_FILE))
        );
    }

    #[test]
    fn test_edit_policy_from_config() {
        let table = TableConfig {
            unknown_ids: UnknownIdPolicy::Reject,
            require_editable: false,
            ..TableConfig::default()
        };
        let policy = table.edit_policy();
        assert_eq!(policy.unknown_ids, UnknownIdPolicy::Reject);
        assert!(!policy.require_editable);
    }
}
