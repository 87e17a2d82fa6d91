//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
mod common;
pub(crate) mod routes;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use routes::RoutesArgs;
