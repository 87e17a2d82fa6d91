//! Site resolution for docweave.
//!
//! This crate wires the pipeline together:
//! - [`Site::resolve`]: registry, materialization, scanning, composition and
//!   link checking for one channel
//! - [`SiteManifest`]: the serialized route table handed to the renderer
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use docweave_config::{ChannelInput, Config};
//! use docweave_site::Site;
//!
//! let config = Config::load(Some(Path::new("docweave.toml")), None)?;
//! let channel = config.resolve_channel(&ChannelInput::from_env())?;
//! let site = Site::resolve(&config, &channel)?;
//! site.manifest().write(&config.output_resolved.manifest)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod manifest;
mod site;

pub use error::SiteError;
pub use manifest::{PageManifest, RouteManifest, SiteManifest, VersionManifest};
pub use site::{ResolvedSite, Site};
