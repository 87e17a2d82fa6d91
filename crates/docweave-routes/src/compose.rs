//! Route composition.
//!
//! Every candidate route is prefixed with the channel base, then all pairs of
//! composed prefixes are checked segment-wise. Two prefixes overlap when one
//! is a segment prefix of the other; `/guide` and `/guide-extra` do not.
//!
//! Two kinds of nesting are allowed:
//!
//! - a route mounted exactly at the channel base (a root mount)
//! - version routes of a source under that source's unlabeled route
//!
//! An allowed nesting still fails when a page of the outer route would be
//! served from inside the inner route's prefix.

use docweave_config::Channel;
use docweave_sources::{Page, RouteCandidate, SidebarItem};

use crate::error::ComposeError;
use crate::route::{Route, RouteTable};

/// A materialized candidate with its scanned content.
#[derive(Debug, Clone)]
pub struct RouteContent {
    /// Candidate from the version materializer.
    pub candidate: RouteCandidate,
    /// Pages found under the candidate root.
    pub pages: Vec<Page>,
    /// Sidebar built for the candidate.
    pub sidebar: Vec<SidebarItem>,
}

/// Compose candidates into the route table of a channel.
///
/// Input order is preserved in the table.
///
/// # Errors
///
/// Returns [`ComposeError::Collision`] for overlapping prefixes and
/// [`ComposeError::Shadowed`] for pages hidden by a nested route.
pub fn compose(channel: &Channel, contents: Vec<RouteContent>) -> Result<RouteTable, ComposeError> {
    let routes: Vec<Route> = contents
        .into_iter()
        .map(|content| into_route(channel, content))
        .collect();

    for (i, a) in routes.iter().enumerate() {
        for b in &routes[i + 1..] {
            check_pair(channel, a, b)?;
        }
    }

    tracing::debug!(
        channel = %channel.name,
        base = %channel.base,
        routes = routes.len(),
        "Composed routes"
    );

    Ok(RouteTable::new(channel.clone(), routes))
}

fn into_route(channel: &Channel, content: RouteContent) -> Route {
    let RouteContent {
        candidate,
        pages,
        sidebar,
    } = content;
    Route {
        prefix: channel.base.join(&candidate.route),
        namespace: candidate.namespace,
        root: candidate.root,
        version: candidate.version,
        edit_url: candidate.edit_url,
        branch: channel.branch.clone(),
        sidebar,
        pages,
    }
}

fn check_pair(channel: &Channel, a: &Route, b: &Route) -> Result<(), ComposeError> {
    let (outer, inner) = if b.prefix.starts_with(&a.prefix) {
        (a, b)
    } else if a.prefix.starts_with(&b.prefix) {
        (b, a)
    } else {
        return Ok(());
    };

    let nesting_allowed = outer.prefix != inner.prefix
        && (outer.prefix == channel.base || is_own_version(outer, inner));
    if !nesting_allowed {
        return Err(ComposeError::Collision {
            first: a.display_name(),
            first_prefix: a.prefix.to_string(),
            second: b.display_name(),
            second_prefix: b.prefix.to_string(),
        });
    }

    if let Some(page) = outer
        .pages
        .iter()
        .find(|p| outer.page_url(p).starts_with(&inner.prefix))
    {
        return Err(ComposeError::Shadowed {
            outer: outer.display_name(),
            inner: inner.display_name(),
            inner_prefix: inner.prefix.to_string(),
            url: outer.page_url(page).to_string(),
            file: page.rel_path.clone(),
        });
    }

    Ok(())
}

/// True if `inner` is a labeled version route nested under its own source's
/// unlabeled route.
fn is_own_version(outer: &Route, inner: &Route) -> bool {
    outer.namespace == inner.namespace
        && inner
            .prefix
            .strip_prefix(&outer.prefix)
            .is_some_and(|rest| rest.segments().len() == 1)
}
