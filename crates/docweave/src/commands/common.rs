//! Arguments shared by every command.

use std::path::PathBuf;

use clap::Args;
use docweave_config::{ChannelInput, CliSettings, Config, LinkPolicy};
use docweave_site::{ResolvedSite, Site};

use crate::error::CliError;
use crate::output::Output;

#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover docweave.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Publishing channel (overrides DOCWEAVE_CHANNEL).
    #[arg(long)]
    pub(crate) channel: Option<String>,

    /// Channel base URL (overrides DOCWEAVE_BASE_URL).
    #[arg(long)]
    pub(crate) base_url: Option<String>,

    /// Policy for links to missing pages: error, warn or ignore.
    #[arg(long, value_parser = parse_policy)]
    pub(crate) on_broken_links: Option<LinkPolicy>,

    /// Policy for links to missing anchors: error, warn or ignore.
    #[arg(long, value_parser = parse_policy)]
    pub(crate) on_broken_anchors: Option<LinkPolicy>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CommonArgs {
    /// Config-level overrides carried by these arguments.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            on_broken_links: self.on_broken_links,
            on_broken_anchors: self.on_broken_anchors,
            ..CliSettings::default()
        }
    }

    /// Load config with `settings`, pick the channel and resolve the site.
    ///
    /// Link warnings are printed; fatal diagnostics surface as the error.
    pub(crate) fn resolve(
        self,
        settings: &CliSettings,
        output: &Output,
    ) -> Result<(Config, ResolvedSite), CliError> {
        let config = Config::load(self.config.as_deref(), Some(settings))?;
        let input = ChannelInput::from_env().with_overrides(self.channel, self.base_url);
        let channel = config.resolve_channel(&input)?;

        let site = Site::resolve(&config, &channel)?;
        for warning in site.warnings() {
            output.warning(&format!("Warning: {warning}"));
        }
        Ok((config, site))
    }
}

fn parse_policy(value: &str) -> Result<LinkPolicy, String> {
    match value {
        "error" => Ok(LinkPolicy::Error),
        "warn" => Ok(LinkPolicy::Warn),
        "ignore" => Ok(LinkPolicy::Ignore),
        other => Err(format!("expected error, warn or ignore, got '{other}'")),
    }
}
