//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate only sees the [`PipelineConfig`]
//! and request defaults derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied by the command handlers)
//! 2. `ENTIGEN_*` environment variables, `__` between sections
//!    (`ENTIGEN_BUILD__TIMEOUT_SECS=900`)
//! 3. `--config FILE`, or else `./.entigen.toml` over the global file
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use entigen_core::{
    application::{PipelineConfig, services::pipeline_service::DEFAULT_WORKSPACE_BASE},
    domain::{DEFAULT_GROUP_ID, RetentionPolicy, WorkspaceLayout},
};
use serde::{Deserialize, Serialize};

/// Local configuration file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".entigen.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ENTIGEN";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub build: BuildConfig,
    pub generation: GenerationConfig,
    pub templates: TemplateConfig,
}

/// Where generated projects go and what happens to failed runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory (per-request layout) or the working root itself
    /// (fixed layout).
    pub root: PathBuf,
    pub layout: LayoutMode,
    pub retention: RetentionPolicy,
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_WORKSPACE_BASE),
            layout: LayoutMode::default(),
            retention: RetentionPolicy::Keep,
            no_color: false,
        }
    }
}

/// Working-root layout as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    #[default]
    PerRequest,
    Fixed,
}

/// External build tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: "mvn".into(),
            args: vec!["clean".into(), "package".into(), "-q".into()],
            timeout_secs: 600,
        }
    }
}

/// Defaults applied to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub group_id: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            group_id: DEFAULT_GROUP_ID.into(),
        }
    }
}

/// Template override settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory of `<kind>.tpl` overrides. Built-ins only when unset.
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit global and local
    /// files are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("Failed to seed default configuration")?,
        );

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder
                .add_source(File::from(Self::config_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("build.args"),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.entigen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "entigen", "entigen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Pipeline layout and retention for `root`.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let root = self.output.root.clone();
        PipelineConfig {
            layout: match self.output.layout {
                LayoutMode::Fixed => WorkspaceLayout::Fixed(root),
                LayoutMode::PerRequest => WorkspaceLayout::PerRequest { base: root },
            },
            retention: self.output.retention,
        }
    }

    /// Value at a dotted key such as `build.timeout_secs`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let root = serde_json::to_value(self).ok()?;
        key.split('.')
            .try_fold(&root, |value, part| value.get(part))
            .cloned()
    }
}
