//! `build` command.

use std::path::PathBuf;

use clap::Args;

use super::common::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,

    /// Manifest output path (default: from config or build/routes.json).
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let settings = docweave_config::CliSettings {
            manifest: self.out,
            ..self.common.cli_settings()
        };
        let (config, site) = self.common.resolve(&settings, &output)?;

        let manifest = site.manifest();
        manifest.write(&config.output_resolved.manifest)?;

        let pages: usize = site.routes().routes().iter().map(|r| r.pages.len()).sum();
        output.success(&format!(
            "Resolved {} routes ({} pages) for channel '{}'",
            site.routes().len(),
            pages,
            manifest.channel
        ));
        output.info(&format!(
            "Manifest: {}",
            config.output_resolved.manifest.display()
        ));
        Ok(())
    }
}
