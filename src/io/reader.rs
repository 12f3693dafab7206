use std::io::Read;

use serde_json::Value;

use crate::io::format::{json, toml, yaml};
use crate::io::{Format, IoError};

pub fn read_values<R: Read>(reader: R, format: Format) -> Result<Vec<Value>, IoError> {
    match format {
        Format::Json => json::read_json(reader),
        Format::Yaml => yaml::read_yaml(reader),
        Format::Toml => toml::read_toml(reader),
    }
}
