use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::error::InputError;
use crate::io::{self, IoError};

/// Input key carrying the instance self-links checked by `vm`.
pub const SELF_LINKS_KEY: &str = "output_self_links";
/// Input key carrying the files checked by `remote`.
pub const VERIFY_FILES_KEY: &str = "input_verify_files";
/// Value used when `input_verify_files` is not supplied.
pub const DEFAULT_VERIFY_FILES: &str = "[]";

static LIST_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:[\[\]]|\\?")"#).expect("list decoration pattern compiles"));

/// Key-value input source supplying parameters to checks at run time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    values: BTreeMap<String, Value>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an inputs document whose format is resolved from the extension.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let display = path.display().to_string();
        let format = io::resolve_input_format(path).map_err(|source| InputError::ReadFile {
            path: display.clone(),
            source,
        })?;
        let file = File::open(path).map_err(|source| InputError::OpenFile {
            path: display.clone(),
            source,
        })?;
        let values = io::reader::read_values(file, format).map_err(|source: IoError| {
            InputError::ReadFile {
                path: display.clone(),
                source,
            }
        })?;
        Self::from_values(values, &display)
    }

    fn from_values(values: Vec<Value>, path: &str) -> Result<Self, InputError> {
        let mut values = values.into_iter();
        match (values.next(), values.next()) {
            (Some(Value::Object(map)), None) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            (None, None) => Ok(Self::new()),
            _ => Err(InputError::NotAnObject {
                path: path.to_string(),
            }),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Applies a `key=value` override. The value is taken as JSON when it
    /// parses, otherwise as a plain string.
    pub fn apply_override(&mut self, raw: &str) -> Result<(), InputError> {
        let Some((key, value)) = raw.split_once('=') else {
            return Err(InputError::InvalidOverride {
                raw: raw.to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(InputError::InvalidOverride {
                raw: raw.to_string(),
            });
        }
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        self.set(key, value);
        Ok(())
    }

    /// Reads a required list of strings; a single string counts as one item.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>, InputError> {
        let value = self.get(key).ok_or_else(|| InputError::Missing {
            key: key.to_string(),
        })?;
        match value {
            Value::String(single) => Ok(vec![single.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(ToOwned::to_owned)
                        .ok_or_else(|| InputError::InvalidType {
                            key: key.to_string(),
                            expected: "a list of strings",
                        })
                })
                .collect(),
            _ => Err(InputError::InvalidType {
                key: key.to_string(),
                expected: "a list of strings",
            }),
        }
    }

    /// Reads the verify-files list. Native lists are taken as-is; strings go
    /// through [`parse_list_literal`]; an absent key means no files.
    pub fn verify_files(&self) -> Result<Vec<String>, InputError> {
        match self.get(VERIFY_FILES_KEY) {
            None | Some(Value::Null) => Ok(parse_list_literal(DEFAULT_VERIFY_FILES)),
            Some(Value::String(raw)) => Ok(parse_list_literal(raw)),
            Some(Value::Array(_)) => Ok(self
                .string_list(VERIFY_FILES_KEY)?
                .into_iter()
                .map(|path| path.trim().to_string())
                .filter(|path| !path.is_empty())
                .collect()),
            Some(_) => Err(InputError::InvalidType {
                key: VERIFY_FILES_KEY.to_string(),
                expected: "a string-encoded list or a list of strings",
            }),
        }
    }
}

/// Turns a bracketed, quoted, comma-separated list string such as
/// `["/tmp/a.txt", "/tmp/b.txt"]` into its items. Blank items are dropped,
/// so `[]` and the empty string both yield an empty list.
pub fn parse_list_literal(raw: &str) -> Vec<String> {
    let stripped = LIST_DECORATION.replace_all(raw, "");
    stripped
        .replace(", ", ",")
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
