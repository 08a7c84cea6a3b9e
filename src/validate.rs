// ✅ Row Validator / Normalizer
// Coordinates must be present and numeric; everything else is optional

use crate::error::RowError;
use crate::record::CoinRecord;

// ============================================================================
// VALIDATED ROW
// ============================================================================

/// A row that passed validation, with its normalized values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow<'a> {
    pub record: &'a CoinRecord,
    /// Record id, numeric-normalized
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Four-digit year the record was created, if known
    pub created_year: Option<String>,
}

pub fn validate_row(record: &CoinRecord) -> Result<ValidatedRow<'_>, RowError> {
    let lat_str = non_empty(record.four_figure_lat.as_deref());
    let lon_str = non_empty(record.four_figure_lon.as_deref());

    let (lat_str, lon_str) = match (lat_str, lon_str) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(RowError::MissingCoordinates),
    };

    let latitude = parse_coordinate("fourFigureLat", lat_str)?;
    let longitude = parse_coordinate("fourFigureLon", lon_str)?;

    let id = non_empty(record.id.as_deref())
        .map(normalize_numeric_id)
        .ok_or(RowError::MissingRecordId)?;

    Ok(ValidatedRow {
        record,
        id,
        latitude,
        longitude,
        created_year: extract_year(record.created.as_deref()),
    })
}

// ============================================================================
// FIELD NORMALIZERS
// ============================================================================

/// Trimmed value, or `None` when absent or blank.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64, RowError> {
    match value.parse::<f64>() {
        // NaN/inf parse fine but cannot be written as JSON numbers
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(RowError::InvalidCoordinate {
            field,
            value: value.to_string(),
        }),
    }
}

/// Year from a "created" timestamp such as `2012-05-01 10:00:00`.
/// Only a leading run of four ASCII digits counts.
pub fn extract_year(created: Option<&str>) -> Option<String> {
    let created = non_empty(created)?;
    let year: String = created.chars().take(4).collect();

    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

/// `"12345.0"` → `"12345"`. Identifiers that are not a plain number are
/// returned as-is (trimmed).
pub fn normalize_numeric_id(value: &str) -> String {
    let value = value.trim();
    let digits_only = value.replacen('.', "", 1);
    let is_number = !digits_only.is_empty() && digits_only.chars().all(|c| c.is_ascii_digit());

    if !is_number {
        return value.to_string();
    }

    match value.split_once('.') {
        Some(("", _)) => "0".to_string(),
        Some((whole, _)) => whole.to_string(),
        None => value.to_string(),
    }
}

/// Year from a date column, dropping any decimal suffix (`"-27.0"` → `"-27"`).
/// `Ok(None)` when the column is empty.
pub fn strip_decimal_suffix(field: &'static str, value: Option<&str>) -> Result<Option<String>, RowError> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };

    let whole = match value.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c.is_ascii_digit()) => whole,
        Some(_) => {
            return Err(RowError::InvalidDate {
                field,
                value: value.to_string(),
            })
        }
        None => value,
    };

    match whole.parse::<i64>() {
        Ok(year) => Ok(Some(year.to_string())),
        Err(_) => Err(RowError::InvalidDate {
            field,
            value: value.to_string(),
        }),
    }
}
