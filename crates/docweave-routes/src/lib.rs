//! Route composition for docweave.
//!
//! Merges the route candidates of every source into one URL space under the
//! active channel's base and rejects overlapping prefixes. The result is an
//! immutable [`RouteTable`] consumed by link checking and the manifest.

mod compose;
mod error;
mod route;

pub use compose::{RouteContent, compose};
pub use error::ComposeError;
pub use route::{Route, RouteTable};
