//! User settings governing how missing modules are scaffolded.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for in the active document's ancestors.
pub const SETTINGS_FILE_NAME: &str = ".modlink.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// How a bare (dependency) module name should be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// Defer to the editor's choice menu
    #[default]
    Ask,
    File,
    Index,
    Package,
}

impl PackageType {
    /// The strategy this setting pins, or `None` for [`PackageType::Ask`].
    pub fn fixed_strategy(self) -> Option<Strategy> {
        match self {
            PackageType::Ask => None,
            PackageType::File => Some(Strategy::File),
            PackageType::Index => Some(Strategy::IndexPackage),
            PackageType::Package => Some(Strategy::FullPackage),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ask" => Some(PackageType::Ask),
            "file" => Some(PackageType::File),
            "index" => Some(PackageType::Index),
            "package" => Some(PackageType::Package),
            _ => None,
        }
    }
}

/// Concrete layout produced for a dependency module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A single source file directly inside `node_modules`
    File,
    /// A package directory holding only `index.js`
    IndexPackage,
    /// A package directory with `package.json` and its main entry
    FullPackage,
}

/// Menu entry describing a [`Strategy`] to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyChoice {
    pub strategy: Strategy,
    pub label: String,
    pub description: &'static str,
}

impl Strategy {
    /// Menu entries in presentation order.
    pub fn choices(module_name: &str) -> Vec<StrategyChoice> {
        vec![
            StrategyChoice {
                strategy: Strategy::FullPackage,
                label: "With package.json".to_string(),
                description: "Create as a full package. Default package info can be set in your settings.",
            },
            StrategyChoice {
                strategy: Strategy::IndexPackage,
                label: "With index.js".to_string(),
                description: "Create as a package, but with no package.json.",
            },
            StrategyChoice {
                strategy: Strategy::File,
                label: format!("{module_name}.js"),
                description: "Create as a file only.",
            },
        ]
    }
}

/// Scaffold settings, read from JSON with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScaffoldSettings {
    pub package_type: PackageType,

    /// Manifest template; `[name]` in any string is replaced by the package name
    pub package_defaults: Map<String, Value>,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        let mut package_defaults = Map::new();
        package_defaults.insert("name".to_string(), Value::from("[name]"));
        package_defaults.insert("version".to_string(), Value::from("1.0.0"));
        Self {
            package_type: PackageType::Ask,
            package_defaults,
        }
    }
}

impl ScaffoldSettings {
    pub fn from_json(path: &Path, raw: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &raw)
    }

    /// Load the nearest settings file found walking up from `start_dir`,
    /// falling back to defaults when there is none.
    pub fn discover(start_dir: &Path) -> Result<Self, SettingsError> {
        for dir in start_dir.ancestors() {
            let candidate = dir.join(SETTINGS_FILE_NAME);
            if candidate.is_file() {
                log::debug!("Using settings from {}", candidate.display());
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn parses_camel_case_settings() {
        let raw = r#"{"packageType": "package", "packageDefaults": {"main": "[name]/index.js"}}"#;
        let settings = ScaffoldSettings::from_json(Path::new("s.json"), raw).expect("parse");

        assert_eq!(settings.package_type, PackageType::Package);
        assert_eq!(
            settings.package_defaults.get("main"),
            Some(&Value::from("[name]/index.js"))
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings = ScaffoldSettings::from_json(Path::new("s.json"), "{}").expect("parse");
        assert_eq!(settings, ScaffoldSettings::default());
    }

    #[test]
    fn unknown_package_type_is_rejected() {
        let err = ScaffoldSettings::from_json(Path::new("s.json"), r#"{"packageType": "zip"}"#)
            .expect_err("invalid");
        assert!(err.to_string().contains("s.json"));
    }

    #[test]
    fn fixed_strategy_mapping() {
        assert_eq!(PackageType::Ask.fixed_strategy(), None);
        assert_eq!(PackageType::File.fixed_strategy(), Some(Strategy::File));
        assert_eq!(PackageType::Index.fixed_strategy(), Some(Strategy::IndexPackage));
        assert_eq!(PackageType::Package.fixed_strategy(), Some(Strategy::FullPackage));
        assert_eq!(PackageType::parse(" Index "), Some(PackageType::Index));
    }

    #[test]
    fn discover_walks_up_to_nearest_settings_file() {
        let temp = TempDir::new().expect("tempdir");
        let nested = temp.path().join("src/deep");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(
            temp.path().join(SETTINGS_FILE_NAME),
            r#"{"packageType": "index"}"#,
        )
        .expect("write");

        let settings = ScaffoldSettings::discover(&nested).expect("discover");
        assert_eq!(settings.package_type, PackageType::Index);
    }
}
