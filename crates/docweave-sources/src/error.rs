//! Source error types.

use std::path::PathBuf;

use docweave_config::RoutePathError;

/// Errors raised while registering, materializing or scanning sources.
///
/// Every variant is fatal: a source that cannot be resolved leaves the
/// composed site undefined.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Namespace is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid namespace '{0}': use letters, digits, '-' or '_'")]
    InvalidNamespace(String),

    /// Two sources share a namespace.
    #[error("Duplicate source namespace '{0}'")]
    DuplicateNamespace(String),

    /// Source or version root does not exist or is not a directory.
    #[error("Source '{namespace}': root {} does not exist or is not a directory", path.display())]
    MissingRoot {
        /// Owning namespace.
        namespace: String,
        /// Missing path.
        path: PathBuf,
    },

    /// Route prefix is not a well-formed absolute path.
    #[error("Source '{namespace}': invalid route prefix: {source}")]
    InvalidRoute {
        /// Owning namespace.
        namespace: String,
        /// Validation failure.
        source: RoutePathError,
    },

    /// Edit-link template is malformed.
    #[error("Source '{namespace}': invalid edit_url template: {message}")]
    InvalidEditUrl {
        /// Owning namespace.
        namespace: String,
        /// What is wrong with the template.
        message: String,
    },

    /// Version label cannot be used as a route segment.
    #[error("Source '{namespace}': invalid version label '{label}': {source}")]
    InvalidVersionLabel {
        /// Owning namespace.
        namespace: String,
        /// Offending label.
        label: String,
        /// Validation failure.
        source: RoutePathError,
    },

    /// Two versions of one source share a label.
    #[error("Source '{namespace}': duplicate version label '{label}'")]
    DuplicateVersion {
        /// Owning namespace.
        namespace: String,
        /// Duplicated label.
        label: String,
    },

    /// A version listed in `include` has no snapshot directory.
    #[error("Source '{namespace}': version '{label}' is listed in include but was not found")]
    MissingVersion {
        /// Owning namespace.
        namespace: String,
        /// Missing label.
        label: String,
    },

    /// Filesystem error while scanning.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Page front matter is malformed.
    #[error("Invalid front matter in {}: {message}", path.display())]
    FrontMatter {
        /// Page file.
        path: PathBuf,
        /// Parse or validation failure.
        message: String,
    },

    /// Page file or directory name cannot be used as a URL segment.
    #[error("Page {} cannot be routed: {source}", path.display())]
    InvalidPagePath {
        /// Page file.
        path: PathBuf,
        /// Validation failure.
        source: RoutePathError,
    },

    /// Two pages of one route map to the same URL.
    #[error(
        "Source '{namespace}': pages {} and {} both map to '{slug}'",
        first.display(),
        second.display()
    )]
    DuplicatePage {
        /// Owning namespace.
        namespace: String,
        /// Shared slug.
        slug: String,
        /// First page file.
        first: PathBuf,
        /// Second page file.
        second: PathBuf,
    },

    /// Explicit sidebar file is missing.
    #[error("Source '{namespace}': sidebar file {} not found", path.display())]
    MissingSidebar {
        /// Owning namespace.
        namespace: String,
        /// Expected sidebar path.
        path: PathBuf,
    },

    /// Explicit sidebar file is malformed.
    #[error("Invalid sidebar file {}: {message}", path.display())]
    Sidebar {
        /// Sidebar file.
        path: PathBuf,
        /// Parse failure.
        message: String,
    },

    /// Explicit sidebar references a doc id that does not exist.
    #[error("Sidebar {} references unknown doc '{id}'", path.display())]
    UnknownSidebarDoc {
        /// Sidebar file.
        path: PathBuf,
        /// Unknown doc id.
        id: String,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
