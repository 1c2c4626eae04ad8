//! Package manifest rendering for the full-package strategy.

use crate::error::{Result, ScaffoldError};
use modlink_protocol::with_default_extension;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

pub const MANIFEST_FILE_NAME: &str = "package.json";
pub const DEFAULT_MAIN: &str = "index.js";

const NAME_PLACEHOLDER: &str = "[name]";

/// A rendered `package.json` for one package.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

/// Where the manifest's `main` entry lives, relative to the package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainEntry {
    pub dirs: Vec<String>,
    pub file: String,
}

impl Manifest {
    /// Substitute `[name]` into every string of `template` and make sure `main` is set.
    pub fn render(template: &Map<String, Value>, package_name: &str) -> Result<Self> {
        let mut fields: Map<String, Value> = template
            .iter()
            .map(|(key, value)| (key.clone(), substitute(value, package_name)))
            .collect();

        match fields.get("main") {
            None => {
                fields.insert("main".to_string(), Value::from(DEFAULT_MAIN));
            }
            Some(Value::String(main)) if main.is_empty() => {
                fields.insert("main".to_string(), Value::from(DEFAULT_MAIN));
            }
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(ScaffoldError::InvalidManifest(format!(
                    "\"main\" must be a string, found {other}"
                )))
            }
        }
        Ok(Self { fields })
    }

    pub fn main(&self) -> &str {
        self.fields
            .get("main")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MAIN)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Split `main` on `/` into the directories to create and the entry file name.
    ///
    /// `main` is a package-relative URL-style path regardless of platform.
    pub fn main_entry(&self) -> Result<MainEntry> {
        let main = self.main();
        let mut segments: Vec<&str> = main.split('/').collect();
        let tail = segments.pop().unwrap_or_default();
        if matches!(tail, "" | "." | "..") {
            return Err(ScaffoldError::InvalidManifest(format!(
                "\"main\" does not name a file: {main:?}"
            )));
        }

        let mut dirs = Vec::new();
        for segment in segments {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(ScaffoldError::InvalidManifest(format!(
                        "\"main\" leaves the package directory: {main:?}"
                    )))
                }
                _ => dirs.push(segment.to_string()),
            }
        }
        Ok(MainEntry {
            dirs,
            file: with_default_extension(tail).into_owned(),
        })
    }

    /// Tab-indented JSON, one key per line, with a trailing newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
        self.fields
            .serialize(&mut serializer)
            .map_err(|e| ScaffoldError::InvalidManifest(e.to_string()))?;
        out.push(b'\n');
        Ok(out)
    }
}

fn substitute(value: &Value, package_name: &str) -> Value {
    match value {
        Value::String(s) => Value::String(s.replace(NAME_PLACEHOLDER, package_name)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, package_name)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, package_name)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("template must be an object"),
        }
    }

    #[test]
    fn substitutes_name_everywhere_and_defaults_main() {
        let manifest = Manifest::render(
            &template(json!({
                "name": "[name]",
                "description": "The [name] package, aka [name]",
                "keywords": ["[name]", "util"],
                "repository": {"url": "https://example.com/[name]"}
            })),
            "leftpad",
        )
        .expect("render");

        assert_eq!(
            Value::Object(manifest.fields().clone()),
            json!({
                "name": "leftpad",
                "description": "The leftpad package, aka leftpad",
                "keywords": ["leftpad", "util"],
                "repository": {"url": "https://example.com/leftpad"},
                "main": "index.js"
            })
        );
    }

    #[test]
    fn empty_main_falls_back_and_non_string_main_is_rejected() {
        let manifest = Manifest::render(&template(json!({"main": ""})), "x").expect("render");
        assert_eq!(manifest.main(), DEFAULT_MAIN);

        let err = Manifest::render(&template(json!({"main": 3})), "x").expect_err("invalid");
        assert!(matches!(err, ScaffoldError::InvalidManifest(_)));
    }

    #[test]
    fn renders_tab_indented_with_numbers_and_booleans() {
        let manifest = Manifest::render(
            &template(json!({"name": "[name]", "private": true, "rev": 2, "files": []})),
            "leftpad",
        )
        .expect("render");
        let text = String::from_utf8(manifest.to_bytes().expect("bytes")).expect("utf8");

        assert_eq!(
            text,
            "{\n\t\"name\": \"leftpad\",\n\t\"private\": true,\n\t\"rev\": 2,\n\t\"files\": [],\n\t\"main\": \"index.js\"\n}\n"
        );
    }

    #[test]
    fn main_entry_splits_on_slashes() {
        let manifest =
            Manifest::render(&template(json!({"main": "[name]/lib/index"})), "leftpad").expect("render");
        assert_eq!(
            manifest.main_entry().expect("entry"),
            MainEntry {
                dirs: vec!["leftpad".to_string(), "lib".to_string()],
                file: "index.js".to_string(),
            }
        );

        let manifest = Manifest::render(&template(json!({"main": "./dist/main.json"})), "x").expect("render");
        assert_eq!(
            manifest.main_entry().expect("entry"),
            MainEntry {
                dirs: vec!["dist".to_string()],
                file: "main.json".to_string(),
            }
        );
    }

    #[test]
    fn main_entry_rejects_escapes_and_missing_file_names() {
        for main in ["../outside.js", "lib/", "a/.."] {
            let manifest = Manifest::render(&template(json!({ "main": main })), "x").expect("render");
            assert!(manifest.main_entry().is_err(), "{main}");
        }
    }
}
