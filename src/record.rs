// 📂 Record Reader
// Parses the geocoded finds CSV into typed rows, one per coin find

use crate::error::{PipelineError, Result, RowError};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One coin find as exported by the finds database (and geocoded).
///
/// Every column is optional: absent columns and empty cells both become
/// `None`. Cells are whitespace-trimmed on read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoinRecord {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    #[serde(rename = "id")]
    pub id: Option<String>,

    #[serde(rename = "findIdentifier")]
    pub find_identifier: Option<String>,

    #[serde(rename = "old_findID")]
    pub old_find_id: Option<String>,

    // ========================================================================
    // LOCATION
    // ========================================================================
    #[serde(rename = "fourFigureLat")]
    pub four_figure_lat: Option<String>,

    #[serde(rename = "fourFigureLon")]
    pub four_figure_lon: Option<String>,

    #[serde(rename = "county")]
    pub county: Option<String>,

    #[serde(rename = "district")]
    pub district: Option<String>,

    #[serde(rename = "parish")]
    pub parish: Option<String>,

    #[serde(rename = "knownas")]
    pub known_as: Option<String>,

    // ========================================================================
    // OBJECT
    // ========================================================================
    #[serde(rename = "objecttype")]
    pub object_type: Option<String>,

    #[serde(rename = "broadperiod")]
    pub broad_period: Option<String>,

    #[serde(rename = "description")]
    pub description: Option<String>,

    #[serde(rename = "denominationName")]
    pub denomination_name: Option<String>,

    #[serde(rename = "manufactureTerm")]
    pub manufacture_term: Option<String>,

    #[serde(rename = "metal")]
    pub metal: Option<String>,

    #[serde(rename = "materialTerm")]
    pub material_term: Option<String>,

    #[serde(rename = "weight")]
    pub weight: Option<String>,

    #[serde(rename = "institution")]
    pub institution: Option<String>,

    #[serde(rename = "filename")]
    pub filename: Option<String>,

    // ========================================================================
    // ISSUE (ruler, moneyer, mint, type)
    // ========================================================================
    #[serde(rename = "rulerName")]
    pub ruler_name: Option<String>,

    #[serde(rename = "moneyerName")]
    pub moneyer_name: Option<String>,

    #[serde(rename = "mintName")]
    pub mint_name: Option<String>,

    #[serde(rename = "rrcType")]
    pub rrc_type: Option<String>,

    #[serde(rename = "rrcID")]
    pub rrc_id: Option<String>,

    // ========================================================================
    // AUTHORITY IDENTIFIERS (become cross-reference links)
    // ========================================================================
    #[serde(rename = "rulerNomisma")]
    pub ruler_nomisma: Option<String>,

    #[serde(rename = "nomismaMintID")]
    pub nomisma_mint_id: Option<String>,

    #[serde(rename = "pleiadesID")]
    pub pleiades_id: Option<String>,

    #[serde(rename = "moneyerID")]
    pub moneyer_id: Option<String>,

    #[serde(rename = "rulerDbpedia")]
    pub ruler_dbpedia: Option<String>,

    // ========================================================================
    // DATES
    // ========================================================================
    // Some exports spell these in lower case, some carry both columns
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,

    #[serde(rename = "fromdate")]
    pub from_date_lower: Option<String>,

    #[serde(rename = "toDate")]
    pub to_date: Option<String>,

    #[serde(rename = "todate")]
    pub to_date_lower: Option<String>,

    #[serde(rename = "created")]
    pub created: Option<String>,
}

impl CoinRecord {
    /// Human-readable identifier for log lines
    pub fn label(&self) -> &str {
        self.find_identifier.as_deref().unwrap_or("N/A")
    }

    /// `fromDate`, else `fromdate`
    pub fn from_date(&self) -> Option<&str> {
        first_filled(&self.from_date, &self.from_date_lower)
    }

    /// `toDate`, else `todate`
    pub fn to_date(&self) -> Option<&str> {
        first_filled(&self.to_date, &self.to_date_lower)
    }
}

fn first_filled<'a>(primary: &'a Option<String>, variant: &'a Option<String>) -> Option<&'a str> {
    [primary, variant]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .find(|v| !v.trim().is_empty())
}

/// A data line from the source file, decoded or not.
#[derive(Debug, Clone)]
pub struct SourceRow {
    /// 1-based line in the source file (header is line 1)
    pub line: usize,
    pub record: std::result::Result<CoinRecord, RowError>,
}

/// Decode every data line of a CSV stream. A line that cannot be decoded
/// yields a `RowError::Unreadable` instead of failing the batch; only an
/// unreadable header row is an error.
pub fn parse_rows<R: Read>(reader: R) -> csv::Result<Vec<SourceRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    rdr.headers()?;

    let rows = rdr
        .deserialize::<CoinRecord>()
        .enumerate()
        .map(|(idx, result)| SourceRow {
            line: idx + 2, // +2 because: 1-indexed + header row
            record: result.map_err(|e| RowError::Unreadable(e.to_string())),
        })
        .collect();

    Ok(rows)
}

/// Open and decode a CSV file.
pub fn load_rows(csv_path: &Path) -> Result<Vec<SourceRow>> {
    let file = File::open(csv_path).map_err(|e| PipelineError::from_io(csv_path, e))?;
    parse_rows(file).map_err(|source| PipelineError::Csv {
        path: csv_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_row() {
        let csv = "\
id,findIdentifier,old_findID,fourFigureLat,fourFigureLon,rrcID,filename
42,PAS-42,ABC-1,51.5,-0.1,RRC-44.5,coin42.jpg
";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);

        let record = rows[0].record.as_ref().unwrap();
        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.find_identifier.as_deref(), Some("PAS-42"));
        assert_eq!(record.old_find_id.as_deref(), Some("ABC-1"));
        assert_eq!(record.four_figure_lat.as_deref(), Some("51.5"));
        assert_eq!(record.four_figure_lon.as_deref(), Some("-0.1"));
        assert_eq!(record.rrc_id.as_deref(), Some("RRC-44.5"));
        assert_eq!(record.filename.as_deref(), Some("coin42.jpg"));
        // Columns not in the header stay empty
        assert_eq!(record.moneyer_id, None);

        println!("✅ Full row parse test PASSED");
    }

    #[test]
    fn test_empty_and_blank_cells_are_none() {
        let csv = "id,description,filename\n7,,   \n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        let record = rows[0].record.as_ref().unwrap();
        assert_eq!(record.id.as_deref(), Some("7"));
        assert_eq!(record.description, None);
        assert_eq!(record.filename, None);
    }

    #[test]
    fn test_cells_are_trimmed() {
        let csv = "id, fourFigureLat ,fourFigureLon\n 9 , 52.25 , 1.5 \n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        let record = rows[0].record.as_ref().unwrap();
        assert_eq!(record.id.as_deref(), Some("9"));
        assert_eq!(record.four_figure_lat.as_deref(), Some("52.25"));
        assert_eq!(record.four_figure_lon.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_header_variants() {
        let csv = "id,fromdate,todate,created\n1,-100.0,-27.0,2012-05-01 10:00:00\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        let record = rows[0].record.as_ref().unwrap();
        assert_eq!(record.from_date(), Some("-100.0"));
        assert_eq!(record.to_date(), Some("-27.0"));
        assert_eq!(record.created.as_deref(), Some("2012-05-01 10:00:00"));
    }

    #[test]
    fn test_both_date_spellings_in_one_header() {
        let csv = "\
id,findIdentifier,fourFigureLat,fourFigureLon,fromDate,fromdate,toDate,todate
1,PAS-1,51.0,0.5,-100.0,-90.0,,-27.0
2,PAS-2,52.0,1.5,,-80.0,-40.0,
";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = rows[0].record.as_ref().unwrap();
        assert_eq!(first.find_identifier.as_deref(), Some("PAS-1"));
        // the camel-case column wins when both are filled
        assert_eq!(first.from_date(), Some("-100.0"));
        assert_eq!(first.to_date(), Some("-27.0"));

        let second = rows[1].record.as_ref().unwrap();
        assert_eq!(second.from_date(), Some("-80.0"));
        assert_eq!(second.to_date(), Some("-40.0"));

        println!("✅ Mixed date header test PASSED");
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = "id,findIdentifier,fourFigureLat,fourFigureLon\n1,PAS-1\n2,PAS-2,51.0,0.5\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        let first = rows[0].record.as_ref().unwrap();
        assert_eq!(first.find_identifier.as_deref(), Some("PAS-1"));
        assert_eq!(first.four_figure_lon, None);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_label_falls_back() {
        let record = CoinRecord::default();
        assert_eq!(record.label(), "N/A");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_rows(Path::new("/nonexistent/geocoded.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    }
}
