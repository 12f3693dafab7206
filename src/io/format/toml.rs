use std::io::Read;

use serde_json::Value;

use crate::io::IoError;

/// TOML documents are always a single table, so this yields exactly one value.
pub fn read_toml<R: Read>(mut reader: R) -> Result<Vec<Value>, IoError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let table: ::toml::Table = ::toml::from_str(&text)?;
    let json_value = serde_json::to_value(table)?;
    Ok(vec![json_value])
}
