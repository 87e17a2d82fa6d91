//! Build channel resolution.
//!
//! A channel is one release track of the site (`stable`, `next`, ...). The
//! active channel is picked once per build from [`ChannelInput`], which is the
//! only piece of docweave that reads the process environment for channel
//! selection.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::route_path::RoutePath;
use crate::ConfigError;

/// Environment variable naming the channel to build.
pub const CHANNEL_ENV: &str = "DOCWEAVE_CHANNEL";

/// Environment variable overriding the channel's base URL.
pub const BASE_URL_ENV: &str = "DOCWEAVE_BASE_URL";

/// Which version of a versioned source is routed without a label segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatestVersion {
    /// Highest released version owns the unlabelled route.
    #[default]
    Released,
    /// In-progress content owns the unlabelled route.
    Current,
}

/// Channel declaration from `[channels.<name>]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelConfig {
    /// Base URL prefix (e.g. `/` or `/next/`).
    pub base_url: String,
    /// Branch substituted into edit-link templates.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Latest-version routing policy.
    #[serde(default)]
    pub latest: LatestVersion,
}

fn default_branch() -> String {
    "main".to_owned()
}

/// Channels used when the config declares none.
pub(crate) fn builtin_channels() -> BTreeMap<String, ChannelConfig> {
    BTreeMap::from([
        (
            "stable".to_owned(),
            ChannelConfig {
                base_url: "/".to_owned(),
                branch: default_branch(),
                latest: LatestVersion::Released,
            },
        ),
        (
            "next".to_owned(),
            ChannelConfig {
                base_url: "/next/".to_owned(),
                branch: default_branch(),
                latest: LatestVersion::Current,
            },
        ),
    ])
}

/// Raw channel selector, read from the environment and CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInput {
    /// Requested channel name.
    pub channel: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
}

impl ChannelInput {
    /// Read [`CHANNEL_ENV`] and [`BASE_URL_ENV`]. Empty values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            channel: read(CHANNEL_ENV),
            base_url: read(BASE_URL_ENV),
        }
    }

    /// Layer explicit values (e.g. CLI flags) over this input.
    #[must_use]
    pub fn with_overrides(self, channel: Option<String>, base_url: Option<String>) -> Self {
        Self {
            channel: channel.or(self.channel),
            base_url: base_url.or(self.base_url),
        }
    }
}

/// The resolved build target. Immutable for the duration of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel name.
    pub name: String,
    /// Base route prefix every route is composed under.
    pub base: RoutePath,
    /// Branch used in edit links.
    pub branch: String,
    /// Latest-version routing policy.
    pub latest: LatestVersion,
}

impl Channel {
    /// Base URL with trailing slash (`/`, `/next/`).
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base.to_dir_string()
    }
}

/// Resolve the active channel.
///
/// - No channel requested: `default_channel` is used.
/// - Unknown channel name: [`ConfigError::UnknownChannel`].
/// - A base-URL override replaces the channel's declared base and must be a
///   well-formed absolute path.
pub(crate) fn resolve(
    channels: &BTreeMap<String, ChannelConfig>,
    default_channel: &str,
    input: &ChannelInput,
) -> Result<Channel, ConfigError> {
    let name = input.channel.as_deref().unwrap_or(default_channel);
    let declared = channels
        .get(name)
        .ok_or_else(|| ConfigError::UnknownChannel {
            name: name.to_owned(),
            available: channels.keys().cloned().collect::<Vec<_>>().join(", "),
        })?;

    let base = match &input.base_url {
        Some(override_url) => {
            RoutePath::parse(override_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
                field: BASE_URL_ENV.to_owned(),
                source,
            })?
        }
        None => RoutePath::parse(&declared.base_url).map_err(|source| {
            ConfigError::InvalidBaseUrl {
                field: format!("channels.{name}.base_url"),
                source,
            }
        })?,
    };

    tracing::debug!(channel = name, base = %base, "Resolved build channel");

    Ok(Channel {
        name: name.to_owned(),
        base,
        branch: declared.branch.clone(),
        latest: declared.latest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(channel: Option<&str>, base_url: Option<&str>) -> ChannelInput {
        ChannelInput {
            channel: channel.map(str::to_owned),
            base_url: base_url.map(str::to_owned),
        }
    }

    #[test]
    fn test_absent_indicator_uses_default_channel() {
        let channel = resolve(&builtin_channels(), "stable", &ChannelInput::default()).unwrap();
        assert_eq!(channel.name, "stable");
        assert!(channel.base.is_root());
        assert_eq!(channel.base_url(), "/");
        assert_eq!(channel.latest, LatestVersion::Released);
    }

    #[test]
    fn test_named_channel_uses_declared_base() {
        let channel = resolve(&builtin_channels(), "stable", &input(Some("next"), None)).unwrap();
        assert_eq!(channel.name, "next");
        assert_eq!(channel.base_url(), "/next/");
        assert_eq!(channel.latest, LatestVersion::Current);
    }

    #[test]
    fn test_base_url_override_takes_precedence() {
        let channel = resolve(
            &builtin_channels(),
            "stable",
            &input(Some("next"), Some("/preview/next")),
        )
        .unwrap();
        assert_eq!(channel.name, "next");
        assert_eq!(channel.base_url(), "/preview/next/");
    }

    #[test]
    fn test_malformed_override_is_fatal() {
        let err = resolve(
            &builtin_channels(),
            "stable",
            &input(None, Some("https://example.com/docs")),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
        assert!(err.to_string().contains(BASE_URL_ENV));
    }

    #[test]
    fn test_unknown_channel_is_fatal() {
        let err = resolve(&builtin_channels(), "stable", &input(Some("beta"), None)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownChannel { .. }));
        let msg = err.to_string();
        assert!(msg.contains("beta"));
        assert!(msg.contains("next, stable"));
    }

    #[test]
    fn test_with_overrides_prefers_explicit_values() {
        let env = input(Some("stable"), Some("/env/"));
        let merged = env.with_overrides(Some("next".to_owned()), None);
        assert_eq!(merged, input(Some("next"), Some("/env/")));
    }

    #[test]
    fn test_from_env_reads_variables() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var(CHANNEL_ENV, "next");
            std::env::set_var(BASE_URL_ENV, "");
        }
        let input = ChannelInput::from_env();
        assert_eq!(input.channel.as_deref(), Some("next"));
        assert_eq!(input.base_url, None);
        unsafe {
            std::env::remove_var(CHANNEL_ENV);
            std::env::remove_var(BASE_URL_ENV);
        }
    }
}
