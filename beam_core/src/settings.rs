//! # Report Settings
//!
//! Presentation and compilation options. Every field has a default, so a run
//! without configuration produces the standard report with the embedded
//! Typst compiler.
//!
//! Settings are read from the JSON file named by the `BEAM_REPORT_SETTINGS`
//! environment variable, when it is set. Missing keys fall back to their
//! defaults:
//!
//! ```json
//! {
//!   "title": "Girder G-3 Force Report",
//!   "compiler": { "external": { "program": "/opt/typst/bin/typst" } }
//! }
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ReportError, ReportResult};

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "BEAM_REPORT_SETTINGS";

/// Options for one report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Title on the cover page
    pub title: String,

    /// Author line on the cover page
    pub author: String,

    /// Which document compiler turns markup into PDF
    pub compiler: CompilerChoice,

    /// How many times the compiler is run over the source
    pub compile_passes: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            title: "Beam Force Analysis Report".to_string(),
            author: "Engineering Internship Evaluation".to_string(),
            compiler: CompilerChoice::default(),
            compile_passes: 2,
        }
    }
}

/// Document compiler selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompilerChoice {
    /// Typst linked into this binary
    #[default]
    Embedded,
    /// A `typst` executable on disk
    External { program: String },
}

impl ReportSettings {
    /// Settings from `BEAM_REPORT_SETTINGS`, or defaults when it is unset.
    pub fn load() -> ReportResult<Self> {
        Self::from_env_value(std::env::var_os(SETTINGS_ENV))
    }

    fn from_env_value(value: Option<OsString>) -> ReportResult<Self> {
        match value {
            Some(path) if !path.is_empty() => Self::load_from(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    /// Read settings from a JSON file.
    pub fn load_from(path: &Path) -> ReportResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ReportError::InvalidSettings {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let settings: ReportSettings =
            serde_json::from_str(&contents).map_err(|e| ReportError::InvalidSettings {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if settings.compile_passes == 0 {
            return Err(ReportError::InvalidSettings {
                path: path.display().to_string(),
                reason: "compile_passes must be at least 1".to_string(),
            });
        }

        info!(path = %path.display(), "loaded report settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ReportSettings::default();
        assert_eq!(settings.compile_passes, 2);
        assert_eq!(settings.compiler, CompilerChoice::Embedded);
        assert_eq!(settings.title, "Beam Force Analysis Report");
    }

    #[test]
    fn test_unset_env_uses_defaults() {
        assert_eq!(ReportSettings::from_env_value(None).unwrap(), ReportSettings::default());
        assert_eq!(
            ReportSettings::from_env_value(Some(OsString::new())).unwrap(),
            ReportSettings::default()
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "title": "Girder G-3", "compiler": { "external": { "program": "typst" } } }"#,
        )
        .unwrap();

        let settings = ReportSettings::load_from(&path).unwrap();
        assert_eq!(settings.title, "Girder G-3");
        assert_eq!(settings.author, ReportSettings::default().author);
        assert_eq!(
            settings.compiler,
            CompilerChoice::External { program: "typst".to_string() }
        );
    }

    #[test]
    fn test_embedded_compiler_serialization() {
        let json = serde_json::to_string(&CompilerChoice::Embedded).unwrap();
        assert_eq!(json, "\"embedded\"");
    }

    #[test]
    fn test_invalid_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, "{ not json").unwrap();
        let err = ReportSettings::load_from(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SETTINGS");

        fs::write(&path, r#"{ "compile_passes": 0 }"#).unwrap();
        assert!(ReportSettings::load_from(&path).is_err());

        assert!(ReportSettings::load_from(&dir.path().join("missing.json")).is_err());
    }
}
