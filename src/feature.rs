// 🗺️ Feature Builder
// Maps a validated coin row to a linked-data GeoJSON feature

use crate::config::PipelineConfig;
use crate::enrich::{
    cross_references, depiction, description, time_span, type_reference, Depiction, Description,
    Link, TypeReference, When,
};
use crate::error::RowError;
use crate::record::CoinRecord;
use crate::validate::validate_row;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Geometry {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }
}

/// Fixed property bag. Values are copied straight from the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(rename = "findIdentifier")]
    pub find_identifier: Option<String>,
    pub objecttype: Option<String>,
    pub broadperiod: Option<String>,
    pub description: Option<String>,
    pub county: Option<String>,
    pub district: Option<String>,
    pub parish: Option<String>,
    pub knownas: Option<String>,
    pub ruler: Option<String>,
    pub moneyer: Option<String>,
    pub denomination: Option<String>,
    pub mint: Option<String>,
    pub manufacture: Option<String>,
    #[serde(rename = "rrcType")]
    pub rrc_type: Option<String>,
    #[serde(rename = "rrcID")]
    pub rrc_id: Option<String>,
    #[serde(rename = "nomismaIssuer")]
    pub nomisma_issuer: Option<String>,
    #[serde(rename = "nomismaMint")]
    pub nomisma_mint: Option<String>,
    #[serde(rename = "pleiadesID")]
    pub pleiades_id: Option<String>,
    #[serde(rename = "issuerDbPedia")]
    pub issuer_dbpedia: Option<String>,
    pub metal: Option<String>,
    #[serde(rename = "materialTerm")]
    pub material_term: Option<String>,
    pub weight: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub institution: Option<String>,
    pub created: Option<String>,
}

impl Properties {
    pub fn from_record(record: &CoinRecord, created_year: Option<String>) -> Self {
        let date_from = record.from_date().map(str::to_string);
        let date_to = record.to_date().map(str::to_string);
        let r = record.clone();
        Properties {
            find_identifier: r.find_identifier,
            objecttype: r.object_type,
            broadperiod: r.broad_period,
            description: r.description,
            county: r.county,
            district: r.district,
            parish: r.parish,
            knownas: r.known_as,
            ruler: r.ruler_name,
            moneyer: r.moneyer_name,
            denomination: r.denomination_name,
            mint: r.mint_name,
            manufacture: r.manufacture_term,
            rrc_type: r.rrc_type,
            rrc_id: r.rrc_id,
            nomisma_issuer: r.ruler_nomisma,
            nomisma_mint: r.nomisma_mint_id,
            pleiades_id: r.pleiades_id,
            issuer_dbpedia: r.ruler_dbpedia,
            metal: r.metal,
            material_term: r.material_term,
            weight: r.weight,
            date_from,
            date_to,
            institution: r.institution,
            created: created_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub geometry: Geometry,
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depictions: Vec<Depiction>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<Description>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeReference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<When>,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Validate a row and build its feature. Fails only with a row-level error.
pub fn build_feature(record: &CoinRecord, config: &PipelineConfig) -> Result<Feature, RowError> {
    let row = validate_row(record)?;
    let when = time_span(record, config)?;

    Ok(Feature {
        id: format!("{}{}", config.record_base_url, row.id),
        kind: "Feature".to_string(),
        geometry: Geometry::point(row.longitude, row.latitude),
        properties: Properties::from_record(record, row.created_year),
        depictions: depiction(record, config).into_iter().collect(),
        descriptions: description(record).into_iter().collect(),
        types: type_reference(record, config).into_iter().collect(),
        links: cross_references(record, config),
        when,
    })
}
