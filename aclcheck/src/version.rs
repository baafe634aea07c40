use std::sync::OnceLock;

/// Semver version with git build metadata when available.
///
/// Returns formats like:
/// - `0.1.0+abc1234`: clean build from a known commit
/// - `0.1.0+abc1234-dirty`: uncommitted changes present
/// - `0.1.0`: git info unavailable (e.g. tarball build)
pub fn version_long() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| match option_env!("ACLCHECK_GIT_HASH") {
        Some(hash) => format!("{}+{}", env!("CARGO_PKG_VERSION"), hash),
        None => env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_package_version() {
        assert!(version_long().starts_with(env!("CARGO_PKG_VERSION")));
    }
}
