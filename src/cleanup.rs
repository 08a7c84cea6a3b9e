// 🧹 Post-processing for published GeoJSON
// Drop empty values from features, and minify for the web map

use crate::error::{PipelineError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// `""`, `null`, `[]` and `{}` carry no information in the published file.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Recursively drop empty entries. Emptiness is checked before a child is
/// cleaned, so an object that only held empty values stays as `{}`.
pub fn remove_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !is_empty_value(v))
                .map(|(k, v)| (k, remove_empty(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !is_empty_value(v))
                .map(remove_empty)
                .collect(),
        ),
        other => other,
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::from_io(path, e))?;
    serde_json::from_str(&text).map_err(|source| PipelineError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Clean the `features` of a FeatureCollection file; other top-level keys
/// are kept as they are. Returns the number of features.
pub fn clean_file(input: &Path, output: &Path) -> Result<usize> {
    let mut document = read_json(input)?;

    let features = document
        .as_object_mut()
        .and_then(|object| object.get_mut("features"))
        .filter(|features| features.is_array())
        .ok_or_else(|| PipelineError::MissingFeatures {
            path: input.to_path_buf(),
        })?;

    let cleaned = remove_empty(features.take());
    let count = cleaned.as_array().map(Vec::len).unwrap_or(0);
    *features = cleaned;

    let mut bytes = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;

    write_bytes(output, &bytes)?;
    info!(input = %input.display(), output = %output.display(), features = count, "cleaned");
    Ok(count)
}

/// Rewrite a JSON file without insignificant whitespace.
pub fn minify_file(input: &Path, output: &Path) -> Result<u64> {
    let document = read_json(input)?;
    let bytes = serde_json::to_vec(&document)?;
    write_bytes(output, &bytes)?;

    info!(input = %input.display(), output = %output.display(), bytes = bytes.len(), "minified");
    Ok(bytes.len() as u64)
}
