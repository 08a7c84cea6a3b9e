// ⚙️ Pipeline Configuration
// Paths, base URLs and fixed dataset metadata for one conversion run

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// DEFAULTS (the values the dataset has always been published with)
// ============================================================================

pub const DEFAULT_INPUT: &str = "../data/geocoded.csv";
pub const DEFAULT_OUTPUT: &str = "../data/republican.geojson";

pub const RECORD_BASE_URL: &str = "https://finds.org.uk/database/artefacts/record/id/";
pub const IMAGE_BASE_URL: &str = "https://republican-coins.museologi.st/images/";
pub const NOMISMA_BASE_URL: &str = "https://nomisma.org/id/";
pub const PLEIADES_BASE_URL: &str = "https://pleiades.stoa.org/places/";
pub const DBPEDIA_BASE_URL: &str = "https://dbpedia.org/resource/";

/// Dataset-level metadata written to the `indexing` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMetadata {
    pub context: String,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub license: String,
    pub identifier: String,
}

impl Default for DatasetMetadata {
    fn default() -> Self {
        DatasetMetadata {
            context: "https://schema.org/".to_string(),
            kind: "Dataset".to_string(),
            name: "Roman Republican Coins from the Portable Antiquities Scheme".to_string(),
            description:
                "An enriched dataset of Roman Republican coins from the Portable Antiquities Scheme"
                    .to_string(),
            license: "https://creativecommons.org/licenses/by/4.0/".to_string(),
            identifier:
                "https://finds.org.uk/database/search/results/broadperiod/ROMAN/reeceID/1/"
                    .to_string(),
        }
    }
}

/// Fixed metadata attached to every time-span assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodMetadata {
    pub name: String,
    pub uri: String,
    pub label: String,
    pub certainty: String,
    pub duration: String,
}

impl Default for PeriodMetadata {
    fn default() -> Self {
        PeriodMetadata {
            name: "Reece period 1".to_string(),
            uri: "https://finds.org.uk/database/terminology/reeceperiods/period/id/1".to_string(),
            label: "Reece period 1 (Pre AD 41)".to_string(),
            certainty: "certain".to_string(),
            duration: "P1Y".to_string(),
        }
    }
}

/// Everything a conversion run needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub record_base_url: String,
    pub image_base_url: String,
    pub nomisma_base_url: String,
    pub pleiades_base_url: String,
    pub dbpedia_base_url: String,
    pub dataset: DatasetMetadata,
    pub period: PeriodMetadata,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            record_base_url: RECORD_BASE_URL.to_string(),
            image_base_url: IMAGE_BASE_URL.to_string(),
            nomisma_base_url: NOMISMA_BASE_URL.to_string(),
            pleiades_base_url: PLEIADES_BASE_URL.to_string(),
            dbpedia_base_url: DBPEDIA_BASE_URL.to_string(),
            dataset: DatasetMetadata::default(),
            period: PeriodMetadata::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a TOML config file. Keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::from_io(path, e))?;
        Self::from_toml(&content).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Builder pattern: override input path
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Builder pattern: override output path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}
