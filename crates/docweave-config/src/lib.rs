//! Configuration management for docweave.
//!
//! Parses `docweave.toml` with serde and provides auto-discovery of the
//! config file in parent directories. Relative paths are resolved against
//! the directory holding the config file.
//!
//! CLI settings can be applied during load via [`CliSettings`]. The active
//! build channel is resolved separately with [`Config::resolve_channel`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `channels.<name>.branch`
//! - `sources[].edit_url`

mod channel;
mod expand;
mod route_path;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use channel::{
    BASE_URL_ENV, CHANNEL_ENV, Channel, ChannelConfig, ChannelInput, LatestVersion,
};
pub use route_path::{RoutePath, RoutePathError};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override manifest output path.
    pub manifest: Option<PathBuf>,
    /// Override broken-link policy.
    pub on_broken_links: Option<LinkPolicy>,
    /// Override broken-anchor policy.
    pub on_broken_anchors: Option<LinkPolicy>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docweave.toml";

/// Default label for in-progress content of versioned sources.
const DEFAULT_CURRENT_LABEL: &str = "next";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel used when none is requested.
    pub default_channel: String,
    /// Declared channels. Built-in `stable` and `next` apply when empty.
    pub channels: BTreeMap<String, ChannelConfig>,
    /// Documentation sources in declaration order (raw, relative paths).
    sources: Vec<SourceConfigRaw>,
    /// Link integrity policy.
    pub links: LinksConfig,
    /// Output configuration (raw, relative paths).
    output: OutputConfigRaw,

    /// Resolved sources (set after loading).
    #[serde(skip)]
    pub sources_resolved: Vec<SourceConfig>,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw source declaration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    namespace: String,
    root: String,
    route: String,
    sidebar: SidebarStrategy,
    edit_url: Option<String>,
    versions: Option<VersionsConfigRaw>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VersionsConfigRaw {
    dir: Option<String>,
    current_label: Option<String>,
    include: Option<Vec<String>>,
}

/// How a source's sidebar is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarStrategy {
    /// Inferred from directory structure and ordering hints.
    #[default]
    Auto,
    /// Read from a sidebar file relative to each content root.
    Explicit(PathBuf),
}

/// Resolved source declaration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Unique namespace.
    pub namespace: String,
    /// Content root (unversioned, in-progress content).
    pub root: PathBuf,
    /// Route prefix as written in the config (validated by the registry).
    pub route: String,
    /// Sidebar generation strategy.
    pub sidebar: SidebarStrategy,
    /// Edit-link template.
    pub edit_url: Option<String>,
    /// Versioning settings; `None` for unversioned sources.
    pub versions: Option<VersionsConfig>,
}

/// Resolved versioning settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionsConfig {
    /// Directory holding `version-<label>` snapshots.
    pub dir: PathBuf,
    /// Route label of in-progress content when it is not the latest.
    pub current_label: String,
    /// Only materialize these labels, when set.
    pub include: Option<Vec<String>>,
}

/// What to do with a class of link diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    /// Fail the build.
    Error,
    /// Report and continue.
    Warn,
    /// Drop silently.
    Ignore,
}

/// Link integrity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Policy for links whose target page does not exist.
    pub on_broken_links: LinkPolicy,
    /// Policy for links whose page exists but anchor does not.
    pub on_broken_anchors: LinkPolicy,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            on_broken_links: LinkPolicy::Error,
            on_broken_anchors: LinkPolicy::Warn,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    manifest: Option<String>,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Route manifest path.
    pub manifest: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Requested channel is not declared.
    #[error("Unknown channel '{name}' (available: {available})")]
    UnknownChannel {
        /// Requested channel name.
        name: String,
        /// Declared channel names.
        available: String,
    },
    /// Base URL is not a well-formed absolute path.
    #[error("Invalid base URL in {field}: {source}")]
    InvalidBaseUrl {
        /// Where the value came from.
        field: String,
        /// Path validation failure.
        source: RoutePathError,
    },
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sources[0].edit_url`").
        field: String,
        /// Error message (e.g., "${`REPO_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docweave.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Resolve the active build channel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownChannel`] or [`ConfigError::InvalidBaseUrl`].
    pub fn resolve_channel(&self, input: &ChannelInput) -> Result<Channel, ConfigError> {
        channel::resolve(&self.channels, &self.default_channel, input)
    }

    /// Directory containing the config file (or `.` for defaults).
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(Path::new("."))
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(manifest) = &settings.manifest {
            self.output_resolved.manifest.clone_from(manifest);
        }
        if let Some(policy) = settings.on_broken_links {
            self.links.on_broken_links = policy;
        }
        if let Some(policy) = settings.on_broken_anchors {
            self.links.on_broken_anchors = policy;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            default_channel: "stable".to_owned(),
            channels: channel::builtin_channels(),
            sources: Vec::new(),
            links: LinksConfig::default(),
            output: OutputConfigRaw::default(),
            sources_resolved: Vec::new(),
            output_resolved: OutputConfig {
                manifest: default_manifest(base),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            sources = config.sources_resolved.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks channel declarations and the structural shape of sources. Source
    /// semantics (namespace uniqueness, roots, route prefixes) are validated by
    /// the source registry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` or `ConfigError::InvalidBaseUrl`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_channels()?;
        self.validate_sources()?;
        Ok(())
    }

    fn validate_channels(&self) -> Result<(), ConfigError> {
        if !self.channels.contains_key(&self.default_channel) {
            return Err(ConfigError::Validation(format!(
                "default_channel '{}' is not declared in [channels]",
                self.default_channel
            )));
        }
        for (name, channel) in &self.channels {
            RoutePath::parse(&channel.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
                field: format!("channels.{name}.base_url"),
                source,
            })?;
            require_non_empty(&channel.branch, &format!("channels.{name}.branch"))?;
        }
        Ok(())
    }

    fn validate_sources(&self) -> Result<(), ConfigError> {
        for (i, source) in self.sources_resolved.iter().enumerate() {
            require_non_empty(&source.namespace, &format!("sources[{i}].namespace"))?;
            require_non_empty(&source.route, &format!("sources[{i}].route"))?;
            if let Some(versions) = &source.versions {
                require_non_empty(
                    &versions.current_label,
                    &format!("sources[{i}].versions.current_label"),
                )?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (name, channel) in &mut self.channels {
            channel.branch = expand::expand_env(&channel.branch, &format!("channels.{name}.branch"))?;
        }
        for (i, source) in self.sources.iter_mut().enumerate() {
            if let Some(ref url) = source.edit_url {
                source.edit_url = Some(expand::expand_env(url, &format!("sources[{i}].edit_url"))?);
            }
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    ///
    /// Also installs the built-in channels when none are declared.
    fn resolve_paths(&mut self, config_dir: &Path) {
        if self.channels.is_empty() {
            self.channels = channel::builtin_channels();
        }

        self.sources_resolved = self
            .sources
            .iter()
            .map(|raw| SourceConfig {
                namespace: raw.namespace.clone(),
                root: config_dir.join(&raw.root),
                route: raw.route.clone(),
                sidebar: raw.sidebar.clone(),
                edit_url: raw.edit_url.clone(),
                versions: raw.versions.as_ref().map(|v| VersionsConfig {
                    dir: config_dir.join(
                        v.dir
                            .clone()
                            .unwrap_or_else(|| format!("{}_versioned_docs", raw.namespace)),
                    ),
                    current_label: v
                        .current_label
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CURRENT_LABEL.to_owned()),
                    include: v.include.clone(),
                }),
            })
            .collect();

        self.output_resolved = OutputConfig {
            manifest: self
                .output
                .manifest
                .as_ref()
                .map_or_else(|| default_manifest(config_dir), |m| config_dir.join(m)),
        };
    }
}

fn default_manifest(base: &Path) -> PathBuf {
    base.join("build").join("routes.json")
}
