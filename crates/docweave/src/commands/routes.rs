//! `routes` command.

use std::fmt::Write;

use clap::Args;
use docweave_site::ResolvedSite;

use super::common::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,

    /// Print the full manifest as JSON.
    #[arg(long)]
    json: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let settings = self.common.cli_settings();
        let (_, site) = self.common.resolve(&settings, &output)?;

        if self.json {
            output.data(&site.manifest().to_json()?);
        } else {
            output.highlight(&format!(
                "Channel '{}' at {}",
                site.routes().channel().name,
                site.routes().channel().base_url()
            ));
            output.data(&render_table(&site));
        }
        Ok(())
    }
}

/// One line per route: prefix, source and page count, aligned on the prefix.
fn render_table(site: &ResolvedSite) -> String {
    let routes = site.routes().routes();
    let width = routes
        .iter()
        .map(|r| r.prefix.to_string().len())
        .max()
        .unwrap_or(0);

    let mut table = String::new();
    for route in routes {
        let _ = writeln!(
            table,
            "{:<width$}  {}  {} pages",
            route.prefix.to_string(),
            route.display_name(),
            route.pages.len(),
        );
    }
    table
}
