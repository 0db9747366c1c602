//! Output formats for decoded resources.

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;

/// How a decoded resource is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Labelled multi-line text.
    #[default]
    Text,
    Yaml,
    Json,
}

/// Serialize a decoded value as YAML.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_yaml_ng::to_string(value)?)
}

/// Serialize a decoded value as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a value in the requested format.
pub fn render<T>(value: &T, format: OutputFormat) -> Result<String>
where
    T: Serialize + std::fmt::Display + ?Sized,
{
    match format {
        OutputFormat::Text => Ok(value.to_string()),
        OutputFormat::Yaml => to_yaml(value),
        OutputFormat::Json => to_json(value),
    }
}
