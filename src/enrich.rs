// 🔗 Enrichment Rules
// Each optional sub-structure of a feature is a pure function of the row.
// A rule returns nothing unless every field it depends on is non-empty.

use crate::config::PipelineConfig;
use crate::error::RowError;
use crate::record::CoinRecord;
use crate::validate::{non_empty, normalize_numeric_id, strip_decimal_suffix};
use serde::{Deserialize, Serialize};

// ============================================================================
// SUB-STRUCTURE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depiction {
    #[serde(rename = "@id")]
    pub id: String,
    pub thumbnail: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub value: String,
}

/// Reference into an external type vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeReference {
    pub identifier: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub identifier: String,
    #[serde(rename = "type")]
    pub relation: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    #[serde(rename = "in")]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timespan {
    pub start: YearPoint,
    pub end: YearPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub name: String,
    pub uri: String,
}

/// Linked Places `when` assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct When {
    pub timespans: Vec<Timespan>,
    pub periods: Vec<Period>,
    pub label: String,
    pub certainty: String,
    pub duration: String,
}

// ============================================================================
// RULES
// ============================================================================

/// Image of the coin, when a file was downloaded for it.
///
/// The label names the legacy find id (`old_findID`); unlike the first
/// published dataset it falls back to `findIdentifier`, then `id`, when that is empty.
pub fn depiction(record: &CoinRecord, config: &PipelineConfig) -> Option<Depiction> {
    let filename = non_empty(record.filename.as_deref())?;
    let url = format!("{}{}", config.image_base_url, filename);

    let subject = non_empty(record.old_find_id.as_deref())
        .or_else(|| non_empty(record.find_identifier.as_deref()))
        .or_else(|| non_empty(record.id.as_deref()))
        .unwrap_or_default();

    Some(Depiction {
        id: url.clone(),
        thumbnail: url,
        label: format!("A depiction of {}", subject),
    })
}

pub fn description(record: &CoinRecord) -> Option<Description> {
    non_empty(record.description.as_deref()).map(|value| Description {
        value: value.to_string(),
    })
}

/// Coin type in the Nomisma vocabulary. Nomisma ids are lower-case.
pub fn type_reference(record: &CoinRecord, config: &PipelineConfig) -> Option<TypeReference> {
    let rrc_id = non_empty(record.rrc_id.as_deref())?;

    Some(TypeReference {
        identifier: format!("{}{}", config.nomisma_base_url, rrc_id.to_lowercase()),
        label: "Nomisma type".to_string(),
    })
}

/// The authority links a row can carry, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossReference {
    NomismaRuler,
    PleiadesPlace,
    NomismaMint,
    NomismaMoneyer,
    DbpediaRuler,
}

impl CrossReference {
    pub const ALL: [CrossReference; 5] = [
        CrossReference::NomismaRuler,
        CrossReference::PleiadesPlace,
        CrossReference::NomismaMint,
        CrossReference::NomismaMoneyer,
        CrossReference::DbpediaRuler,
    ];

    /// Prefix of the human-readable label
    pub fn name(&self) -> &str {
        match self {
            CrossReference::NomismaRuler => "Nomisma ruler",
            CrossReference::PleiadesPlace => "Pleiades place",
            CrossReference::NomismaMint => "Nomisma mint",
            CrossReference::NomismaMoneyer => "Nomisma moneyer",
            CrossReference::DbpediaRuler => "DBpedia ruler",
        }
    }

    fn source<'a>(&self, record: &'a CoinRecord) -> Option<&'a str> {
        let field = match self {
            CrossReference::NomismaRuler => &record.ruler_nomisma,
            CrossReference::PleiadesPlace => &record.pleiades_id,
            CrossReference::NomismaMint => &record.nomisma_mint_id,
            CrossReference::NomismaMoneyer => &record.moneyer_id,
            CrossReference::DbpediaRuler => &record.ruler_dbpedia,
        };
        non_empty(field.as_deref())
    }

    fn base_url<'a>(&self, config: &'a PipelineConfig) -> &'a str {
        match self {
            CrossReference::NomismaRuler
            | CrossReference::NomismaMint
            | CrossReference::NomismaMoneyer => &config.nomisma_base_url,
            CrossReference::PleiadesPlace => &config.pleiades_base_url,
            CrossReference::DbpediaRuler => &config.dbpedia_base_url,
        }
    }

    pub fn link(&self, record: &CoinRecord, config: &PipelineConfig) -> Option<Link> {
        let id = normalize_numeric_id(self.source(record)?);

        Some(Link {
            identifier: format!("{}{}", self.base_url(config), id),
            relation: "seeAlso".to_string(),
            label: format!("{} {}", self.name(), id),
        })
    }
}

/// One `seeAlso` link per non-empty authority identifier.
pub fn cross_references(record: &CoinRecord, config: &PipelineConfig) -> Vec<Link> {
    CrossReference::ALL
        .iter()
        .filter_map(|reference| reference.link(record, config))
        .collect()
}

/// Date range of issue, present only when both ends are known.
pub fn time_span(record: &CoinRecord, config: &PipelineConfig) -> Result<Option<When>, RowError> {
    let (Some(from), Some(to)) = (non_empty(record.from_date()), non_empty(record.to_date())) else {
        return Ok(None);
    };

    // Both ends are present, so a malformed one is a row error
    let (Some(start), Some(end)) = (
        strip_decimal_suffix("fromDate", Some(from))?,
        strip_decimal_suffix("toDate", Some(to))?,
    ) else {
        return Ok(None);
    };

    let period = &config.period;
    Ok(Some(When {
        timespans: vec![Timespan {
            start: YearPoint { year: start },
            end: YearPoint { year: end },
        }],
        periods: vec![Period {
            name: period.name.clone(),
            uri: period.uri.clone(),
        }],
        label: period.label.clone(),
        certainty: period.certainty.clone(),
        duration: period.duration.clone(),
    }))
}
