// 🔄 Conversion Pipeline
// geocoded CSV → validated rows → features → FeatureCollection on disk

use crate::config::PipelineConfig;
use crate::document::{write_document, FeatureCollection};
use crate::error::{Result, RowError};
use crate::feature::{build_feature, Feature};
use crate::record::{load_rows, SourceRow};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A row left out of the output, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: usize,
    pub find_identifier: String,
    pub reason: RowError,
}

/// Outcome of one `convert` run.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub rows_read: usize,
    pub features_written: usize,
    pub skipped: Vec<SkippedRow>,
    pub output: PathBuf,
    /// SHA-256 of the written document
    pub digest: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ConversionReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Convert decoded rows, keeping input order. Bad rows are logged and
/// collected, never fatal.
pub fn convert_rows(rows: &[SourceRow], config: &PipelineConfig) -> (Vec<Feature>, Vec<SkippedRow>) {
    let mut features = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for row in rows {
        let result = row
            .record
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|record| build_feature(record, config));

        match result {
            Ok(feature) => {
                debug!(line = row.line, id = %feature.id, "built feature");
                features.push(feature);
            }
            Err(reason) => {
                let find_identifier = row
                    .record
                    .as_ref()
                    .map(|r| r.label().to_string())
                    .unwrap_or_else(|_| "N/A".to_string());

                warn!(
                    line = row.line,
                    "Skipping row with findIdentifier '{}' due to {}",
                    find_identifier,
                    reason
                );

                skipped.push(SkippedRow {
                    line: row.line,
                    find_identifier,
                    reason,
                });
            }
        }
    }

    (features, skipped)
}

/// Run one full conversion as described by `config`.
pub fn convert(config: &PipelineConfig) -> Result<ConversionReport> {
    let started_at = Utc::now();
    info!(input = %config.input.display(), "loading rows");

    let rows = load_rows(&config.input)?;
    let (features, skipped) = convert_rows(&rows, config);

    let features_written = features.len();
    let document = FeatureCollection::new(&config.dataset, features);
    let digest = write_document(&document, &config.output)?;

    info!(
        output = %config.output.display(),
        features = features_written,
        skipped = skipped.len(),
        "wrote feature collection"
    );

    Ok(ConversionReport {
        rows_read: rows.len(),
        features_written,
        skipped,
        output: config.output.clone(),
        digest,
        started_at,
        finished_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::record::parse_rows;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "id,findIdentifier,old_findID,fourFigureLat,fourFigureLon,filename,description,rrcID,pleiadesID,nomismaMintID,moneyerID,rulerDbpedia,rulerNomisma,fromDate,toDate,created";

    fn run(csv: &str) -> (TempDir, ConversionReport, Value) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("geocoded.csv");
        let output = dir.path().join("republican.geojson");
        fs::write(&input, csv).unwrap();

        let config = PipelineConfig::default()
            .with_input(&input)
            .with_output(&output);
        let report = convert(&config).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        (dir, report, value)
    }

    #[test]
    fn test_single_depicted_find() {
        let csv = format!(
            "{}\n42,PAS-42,ABC-1,51.5,-0.1,coin42.jpg,,,,,,,,,,\n",
            HEADER
        );
        let (_dir, report, value) = run(&csv);

        assert_eq!(report.rows_read, 1);
        assert_eq!(report.features_written, 1);
        assert!(report.skipped.is_empty());

        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        let feature = &features[0];

        assert!(feature["@id"].as_str().unwrap().ends_with("/record/id/42"));
        assert_eq!(feature["geometry"]["coordinates"], json!([-0.1, 51.5]));
        assert_eq!(feature["depictions"].as_array().unwrap().len(), 1);
        assert_eq!(feature["depictions"][0]["label"], "A depiction of ABC-1");
        assert_eq!(
            feature["depictions"][0]["@id"],
            "https://republican-coins.museologi.st/images/coin42.jpg"
        );
        assert!(feature.get("links").is_none());
        assert!(feature.get("types").is_none());
        assert!(feature.get("when").is_none());
        assert!(feature.get("descriptions").is_none());

        println!("✅ Single depicted find test PASSED");
    }

    #[test]
    fn test_missing_longitude_is_skipped() {
        let csv = "id,findIdentifier,fourFigureLat\n7,PAS-7,51.5\n";
        let (_dir, report, value) = run(csv);

        assert!(value["features"].as_array().unwrap().is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].find_identifier, "PAS-7");
        assert_eq!(report.skipped[0].reason, RowError::MissingCoordinates);
        assert_eq!(report.skipped[0].line, 2);
    }

    #[test]
    fn test_time_span_from_decimal_dates() {
        let csv = format!(
            "{}\n5,PAS-5,,52.0,1.25,,,,,,,,,100.0,27.0,\n",
            HEADER
        );
        let (_dir, _report, value) = run(&csv);

        let when = &value["features"][0]["when"];
        assert_eq!(when["timespans"][0]["start"]["in"], "100");
        assert_eq!(when["timespans"][0]["end"]["in"], "27");
        assert_eq!(when["periods"][0]["name"], "Reece period 1");
        assert_eq!(when["label"], "Reece period 1 (Pre AD 41)");
    }

    #[test]
    fn test_bad_rows_do_not_stop_the_batch() {
        let csv = format!(
            "{h}\n1,PAS-1,,51.0,0.5,,,,,,,,,,,\n2,PAS-2,,,,,,,,,,,,,,\n3,PAS-3,,north,0.5,,,,,,,,,,,\n4,PAS-4,,50.0,-1.0,,,,,,,,,,,\n",
            h = HEADER
        );
        let (_dir, report, value) = run(&csv);

        let ids: Vec<&str> = value["features"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["properties"]["findIdentifier"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["PAS-1", "PAS-4"]);
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[1].line, 4);
    }

    #[test]
    fn test_mixed_date_headers_keep_every_row() {
        let csv = "\
id,findIdentifier,fourFigureLat,fourFigureLon,fromDate,fromdate,toDate,todate,created
1,PAS-1,51.0,0.5,-100.0,,,-27.0,2011-02-03
2,PAS-2,52.0,1.5,,c. 90,,,
";
        let (_dir, report, value) = run(csv);

        assert!(report.skipped.is_empty(), "skipped: {:?}", report.skipped);
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["when"]["timespans"][0]["start"]["in"], "-100");
        assert_eq!(features[0]["when"]["timespans"][0]["end"]["in"], "-27");
        assert_eq!(features[0]["properties"]["date_to"], "-27.0");
        assert_eq!(features[0]["properties"]["created"], "2011");
        // a lone, unparseable date only means no time-span
        assert!(features[1].get("when").is_none());
        assert_eq!(features[1]["properties"]["findIdentifier"], "PAS-2");
    }

    #[test]
    fn test_link_count_per_row() {
        let csv = format!(
            "{}\n9,PAS-9,,51.0,0.5,,,,12345.0,rome,,Julius_Caesar,julius_caesar,,,\n",
            HEADER
        );
        let (_dir, _report, value) = run(&csv);

        let links = value["features"][0]["links"].as_array().unwrap();
        assert_eq!(links.len(), 4);
        assert!(links
            .iter()
            .any(|l| l["identifier"] == "https://pleiades.stoa.org/places/12345"));
    }

    #[test]
    fn test_coordinates_round_trip() {
        let rows = parse_rows(
            "id,fourFigureLat,fourFigureLon\n1,51.48765,-0.00012\n2,-33.5,151.25\n".as_bytes(),
        )
        .unwrap();
        let (features, skipped) = convert_rows(&rows, &PipelineConfig::default());
        assert!(skipped.is_empty());

        let doc = FeatureCollection::new(&PipelineConfig::default().dataset, features);
        let text = String::from_utf8(doc.render_pretty().unwrap()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["features"][0]["geometry"]["coordinates"][0].as_f64(), Some("-0.00012".parse().unwrap()));
        assert_eq!(value["features"][0]["geometry"]["coordinates"][1].as_f64(), Some("51.48765".parse().unwrap()));
        assert_eq!(value["features"][1]["geometry"]["coordinates"], json!([151.25, -33.5]));
    }

    #[test]
    fn test_output_is_byte_identical_across_runs() {
        let csv = format!(
            "{}\n42,PAS-42,ABC-1,51.5,-0.1,coin42.jpg,Denarius,RRC-44.5,,,,,,-100.0,-27.0,2012-05-01\n",
            HEADER
        );
        let (dir, first, _) = run(&csv);
        let first_bytes = fs::read(dir.path().join("republican.geojson")).unwrap();

        let config = PipelineConfig::default()
            .with_input(dir.path().join("geocoded.csv"))
            .with_output(dir.path().join("again.geojson"));
        let second = convert(&config).unwrap();
        let second_bytes = fs::read(dir.path().join("again.geojson")).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first.digest, second.digest);

        println!("✅ Idempotence test PASSED");
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.geojson");
        let config = PipelineConfig::default()
            .with_input(dir.path().join("absent.csv"))
            .with_output(&output);

        let err = convert(&config).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
        assert!(!output.exists(), "no output is written when the input is missing");
    }
}
