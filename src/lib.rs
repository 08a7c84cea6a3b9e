// Roman Republican Coins - Core Library
// CSV finds → linked-data GeoJSON, plus post-processing of the published file

pub mod cleanup;
pub mod config;
pub mod document;
pub mod enrich;
pub mod error;
pub mod feature;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod validate;

// Re-export commonly used types
pub use cleanup::{clean_file, minify_file, remove_empty};
pub use config::{DatasetMetadata, PeriodMetadata, PipelineConfig};
pub use document::{write_document, FeatureCollection, Indexing};
pub use enrich::{CrossReference, Depiction, Description, Link, TypeReference, When};
pub use error::{PipelineError, RowError};
pub use feature::{build_feature, Feature, Geometry, Properties};
pub use pipeline::{convert, convert_rows, ConversionReport, SkippedRow};
pub use record::{load_rows, parse_rows, CoinRecord, SourceRow};
pub use validate::{validate_row, ValidatedRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
