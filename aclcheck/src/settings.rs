//! Layered configuration for the `aclcheck` command.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. User file (`<config dir>/aclcheck/config.json`)
//! 3. Project file (`./.aclcheck.json`)
//! 4. `ACLCHECK_*` environment variables

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, instrument};

pub const PROJECT_FILE: &str = ".aclcheck.json";
pub const ENV_PREFIX: &str = "ACLCHECK_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Policy file used when no file is given on the command line.
    pub default_file: PathBuf,
    /// Colored output (still subject to TTY detection and `NO_COLOR`).
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_file: PathBuf::from("acl_policy.hcl"),
            color: true,
        }
    }
}

impl Settings {
    /// Per-user configuration file, if a config directory exists.
    pub fn user_file() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("aclcheck").join("config.json"))
    }

    /// Defaults plus the given JSON files, later files winning. Missing
    /// files contribute nothing.
    pub fn figment_with_files<'a>(files: impl IntoIterator<Item = &'a Path>) -> Figment {
        files.into_iter().fold(
            Figment::from(Serialized::defaults(Settings::default())),
            |figment, path| figment.merge(Json::file(path)),
        )
    }

    /// The full provider stack for `project_dir`.
    pub fn figment(project_dir: &Path) -> Figment {
        let user = Self::user_file();
        let project = project_dir.join(PROJECT_FILE);
        let files = user.iter().map(PathBuf::as_path).chain([project.as_path()]);
        Self::figment_with_files(files).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the effective settings for the current directory.
    #[instrument(level = Level::TRACE)]
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        let settings: Settings = Self::figment(&cwd)
            .extract()
            .context("failed to load aclcheck configuration")?;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let settings: Settings = Settings::figment_with_files([missing.as_path()])
            .extract()
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.json");
        let project = dir.path().join(PROJECT_FILE);
        std::fs::write(&user, r#"{"default_file": "user.hcl", "color": false}"#).unwrap();
        std::fs::write(&project, r#"{"default_file": "project.hcl"}"#).unwrap();

        let settings: Settings = Settings::figment_with_files([user.as_path(), project.as_path()])
            .extract()
            .unwrap();
        assert_eq!(settings.default_file, PathBuf::from("project.hcl"));
        assert!(!settings.color);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join(PROJECT_FILE);
        std::fs::write(&project, r#"{"color": "sometimes"}"#).unwrap();
        let result: Result<Settings, _> =
            Settings::figment_with_files([project.as_path()]).extract();
        assert!(result.is_err());
    }
}
