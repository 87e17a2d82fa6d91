//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (error if unset) and `${VAR:-default}`.

use crate::ConfigError;

/// Expand `${...}` references in `value`, naming `field` in errors.
///
/// Strings without `${` are returned unchanged, so bare `$` and the
/// `{branch}` style placeholders of edit-link templates pass through.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_branch_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCWEAVE_TEST_BRANCH", "release-1");
        }
        let result = expand_env("${DOCWEAVE_TEST_BRANCH}", "channels.stable.branch").unwrap();
        assert_eq!(result, "release-1");
        unsafe {
            std::env::remove_var("DOCWEAVE_TEST_BRANCH");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCWEAVE_TEST_UNSET");
        }
        let result = expand_env("${DOCWEAVE_TEST_UNSET:-main}", "channels.stable.branch").unwrap();
        assert_eq!(result, "main");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCWEAVE_TEST_MISSING");
        }
        let err = expand_env("${DOCWEAVE_TEST_MISSING}", "sources[0].edit_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("DOCWEAVE_TEST_MISSING"));
        assert!(msg.contains("sources[0].edit_url"));
    }

    #[test]
    fn test_template_placeholders_untouched() {
        let template = "https://github.com/org/repo/edit/{branch}/docs/{path}";
        assert_eq!(expand_env(template, "edit_url").unwrap(), template);
    }

    #[test]
    fn test_embedded_var_in_template() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCWEAVE_TEST_REPO", "org/repo");
        }
        let result = expand_env(
            "https://github.com/${DOCWEAVE_TEST_REPO}/edit/{branch}/{path}",
            "edit_url",
        )
        .unwrap();
        assert_eq!(result, "https://github.com/org/repo/edit/{branch}/{path}");
        unsafe {
            std::env::remove_var("DOCWEAVE_TEST_REPO");
        }
    }
}
