// 📦 Document Assembler
// Wraps features in the FeatureCollection envelope and writes it out

use crate::config::DatasetMetadata;
use crate::error::{PipelineError, Result};
use crate::feature::Feature;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Dataset-level metadata block (schema.org `Dataset`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indexing {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub license: String,
    pub identifier: String,
}

impl From<&DatasetMetadata> for Indexing {
    fn from(meta: &DatasetMetadata) -> Self {
        Indexing {
            context: meta.context.clone(),
            kind: meta.kind.clone(),
            name: meta.name.clone(),
            description: meta.description.clone(),
            license: meta.license.clone(),
            identifier: meta.identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub indexing: Indexing,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(metadata: &DatasetMetadata, features: Vec<Feature>) -> Self {
        FeatureCollection {
            kind: "FeatureCollection".to_string(),
            indexing: Indexing::from(metadata),
            features,
        }
    }

    /// Two-space indented UTF-8 JSON with a trailing newline
    pub fn render_pretty(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Hex SHA-256 of the rendered output, for comparing runs
pub fn digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Write the document to `path`; returns the digest of what was written.
pub fn write_document(document: &FeatureCollection, path: &Path) -> Result<String> {
    let bytes = document.render_pretty()?;
    fs::write(path, &bytes).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(digest(&bytes))
}
