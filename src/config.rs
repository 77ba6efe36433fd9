//! Build configuration management.
//!
//! Handles loading, parsing, and validating the `atelier.toml` configuration
//! file. The config file is optional: the defaults reproduce the historical
//! project layout (`src/`, `dist/`, legacy documents at the project root).

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub mod build {
        use std::path::PathBuf;

        pub fn root() -> Option<PathBuf> {
            None
        }
        pub fn source() -> PathBuf {
            "src".into()
        }
        pub fn output() -> PathBuf {
            "dist".into()
        }
        pub fn components() -> PathBuf {
            "components".into()
        }
        pub fn templates() -> PathBuf {
            "templates".into()
        }
        pub fn manifest() -> PathBuf {
            "config/pages.json".into()
        }
        pub fn assets() -> Vec<String> {
            [
                "mapikids-logo-txt.png",
                "favicon.ico",
                "favicon-32x32.png",
                "favicon-16x16.png",
                "apple-touch-icon.png",
            ]
            .map(String::from)
            .to_vec()
        }

        pub mod legacy {
            use std::path::PathBuf;

            pub fn home() -> PathBuf {
                "index.html".into()
            }
            pub fn stats() -> PathBuf {
                "stats.html".into()
            }
        }
    }
}

/// `[build]` section in atelier.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Root directory path
    #[serde(default = "config_defaults::build::root")]
    #[educe(Default = config_defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Source directory path (relative to root)
    #[serde(default = "config_defaults::build::source")]
    #[educe(Default = config_defaults::build::source())]
    pub source: PathBuf,

    /// Output directory path (relative to root)
    #[serde(default = "config_defaults::build::output")]
    #[educe(Default = config_defaults::build::output())]
    pub output: PathBuf,

    /// Fragment directory path (relative to source)
    #[serde(default = "config_defaults::build::components")]
    #[educe(Default = config_defaults::build::components())]
    pub components: PathBuf,

    /// Template directory path (relative to source)
    #[serde(default = "config_defaults::build::templates")]
    #[educe(Default = config_defaults::build::templates())]
    pub templates: PathBuf,

    /// Page manifest path (relative to source)
    #[serde(default = "config_defaults::build::manifest")]
    #[educe(Default = config_defaults::build::manifest())]
    pub manifest: PathBuf,

    /// Asset file names copied verbatim from root into the output root
    #[serde(default = "config_defaults::build::assets")]
    #[educe(Default = config_defaults::build::assets())]
    pub assets: Vec<String>,

    /// Legacy document settings
    #[serde(default)]
    pub legacy: LegacyConfig,
}

/// `[build.legacy]` section
///
/// The two hand-written documents mined for styles, body markup and inline
/// scripts during composition.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct LegacyConfig {
    /// Legacy home document (relative to root)
    #[serde(default = "config_defaults::build::legacy::home")]
    #[educe(Default = config_defaults::build::legacy::home())]
    pub home: PathBuf,

    /// Legacy stats document (relative to root)
    #[serde(default = "config_defaults::build::legacy::stats")]
    #[educe(Default = config_defaults::build::legacy::stats())]
    pub stats: PathBuf,
}

/// Root configuration structure representing atelier.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Resolved config file path
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Get CLI arguments reference
    pub fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());
        self.config_path = root.join(&cli.config);
        self.update_path_with_root(&root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory
    fn update_path_with_root(&mut self, root: &Path) {
        let cli = self.get_cli();

        self.set_root(root);
        Self::update_option(&mut self.build.source, cli.source.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        self.build.source = root.join(&self.build.source);
        self.build.output = root.join(&self.build.output);
        self.build.components = self.build.source.join(&self.build.components);
        self.build.templates = self.build.source.join(&self.build.templates);
        self.build.manifest = self.build.source.join(&self.build.manifest);
        self.build.legacy.home = root.join(&self.build.legacy.home);
        self.build.legacy.stats = root.join(&self.build.legacy.stats);
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        let root = self.get_root();

        if !self.build.source.exists() {
            bail!(ConfigError::Validation(format!(
                "source directory not found: {}",
                self.build.source.display()
            )));
        }

        // The output tree is removed wholesale on every build.
        if self.build.output == root || self.build.source.starts_with(&self.build.output) {
            bail!(ConfigError::Validation(
                "[build.output] must not contain the source tree".into()
            ));
        }

        Ok(())
    }
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = SiteConfig::from_str("").unwrap();

    assert_eq!(config.build.source, PathBuf::from("src"));
    assert_eq!(config.build.output, PathBuf::from("dist"));
    assert_eq!(config.build.components, PathBuf::from("components"));
    assert_eq!(config.build.templates, PathBuf::from("templates"));
    assert_eq!(config.build.manifest, PathBuf::from("config/pages.json"));
    assert_eq!(config.build.assets.len(), 5);
    assert_eq!(config.build.legacy.home, PathBuf::from("index.html"));
    assert_eq!(config.build.legacy.stats, PathBuf::from("stats.html"));
}

#[test]
fn validate_build_config() {
    let config = r#"
        [build]
        source = "site-src"
        output = "out"
        assets = ["logo.png"]

        [build.legacy]
        home = "legacy/home.html"
        stats = "legacy/stats.html"
    "#;
    let config: SiteConfig = toml::from_str(config).unwrap();

    assert_eq!(config.build.source, PathBuf::from("site-src"));
    assert_eq!(config.build.output, PathBuf::from("out"));
    assert_eq!(config.build.assets, vec!["logo.png".to_string()]);
    assert_eq!(config.build.legacy.home, PathBuf::from("legacy/home.html"));
    assert_eq!(config.build.legacy.stats, PathBuf::from("legacy/stats.html"));
}

#[test]
fn test_extra_fields() {
    let config = r#"
        [extra]
        custom_field = "custom_value"
        number_field = 42
    "#;
    let config: SiteConfig = toml::from_str(config).unwrap();

    assert_eq!(
        config.extra.get("custom_field").and_then(|v| v.as_str()),
        Some("custom_value")
    );
    assert_eq!(
        config.extra.get("number_field").and_then(|v| v.as_integer()),
        Some(42)
    );
}

#[test]
fn test_unknown_field_rejection_in_build() {
    let config = r#"
        [build]
        unknown_field = "should_fail"
    "#;
    let result: Result<SiteConfig, _> = toml::from_str(config);

    assert!(result.is_err());
}

#[test]
fn test_unknown_field_rejection_in_legacy() {
    let config = r#"
        [build.legacy]
        unknown_field = "should_fail"
    "#;
    let result: Result<SiteConfig, _> = toml::from_str(config);

    assert!(result.is_err());
}

#[test]
fn test_from_str_invalid_toml() {
    let invalid_config = r#"
        [build
        source = "src"
    "#;
    let result = SiteConfig::from_str(invalid_config);

    assert!(result.is_err());
}

#[test]
fn test_get_root_default() {
    let config = SiteConfig::default();
    assert_eq!(config.get_root(), Path::new("./"));
}

#[test]
fn test_set_root() {
    let mut config = SiteConfig::default();
    config.set_root(Path::new("/custom/path"));
    assert_eq!(config.get_root(), Path::new("/custom/path"));
}

#[test]
fn test_config_error_display() {
    let io_err = ConfigError::Io(
        PathBuf::from("atelier.toml"),
        std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    );
    let display = format!("{}", io_err);
    assert!(display.contains("IO error"));
    assert!(display.contains("atelier.toml"));

    let validation_err = ConfigError::Validation("Test validation error".to_string());
    let display = format!("{}", validation_err);
    assert!(display.contains("Test validation error"));
}
