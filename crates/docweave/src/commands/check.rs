//! `check` command.

use clap::Args;

use super::common::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

impl CheckArgs {
    /// Execute the check command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let settings = self.common.cli_settings();
        let (_, site) = self.common.resolve(&settings, &output)?;

        let report = site.link_report();
        let summary = format!(
            "Checked {} links across {} routes",
            report.checked,
            site.routes().len()
        );
        if site.warnings().is_empty() {
            output.success(&summary);
        } else {
            output.warning(&format!("{summary}, {} warnings", site.warnings().len()));
        }
        Ok(())
    }
}
