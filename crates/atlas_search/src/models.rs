//! Search domain models and shared feature assembly
//!
//! Every search-family service (fuzzy search, geocode, geometry search, and
//! the place lookup built on top of them) returns the same upstream result
//! shape: a summary plus a list of scored results with a position and
//! address/POI detail. The parser here flattens those into GeoJSON Point
//! features.

use atlas_core::ErrorKind;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Echo of the executed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    /// The query as the service understood it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Query interpretation kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    /// Server-side processing time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_time: Option<u64>,
    /// Number of results in this response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u64>,
    /// Offset of this page into the full result set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Total matching results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    /// Fuzziness level the match needed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_level: Option<u8>,
}

/// Result of a search-family call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    /// Echo of the executed query
    pub summary: Option<SearchSummary>,
    /// Matches as GeoJSON Point features
    pub results: FeatureCollection,
}

impl SearchResponse {
    /// Number of returned features
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.features.len()
    }

    /// Whether the search matched nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.features.is_empty()
    }
}

/// Parse the shared search-family payload into point features
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize. Results
/// without a position are skipped, not an error.
pub fn parse_search_body(body: Value) -> Result<SearchResponse, ErrorKind> {
    let raw: RawSearchResponse = serde_json::from_value(body)
        .map_err(|e| ErrorKind::Unexpected(format!("malformed search payload: {e}")))?;

    let features = raw
        .results
        .into_iter()
        .filter_map(result_to_feature)
        .collect();

    Ok(SearchResponse {
        summary: raw.summary,
        results: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    })
}

pub(crate) fn result_to_feature(raw: RawSearchResult) -> Option<Feature> {
    let Some(position) = raw.position else {
        warn!(id = raw.id.as_deref().unwrap_or("?"), "Skipping result without position");
        return None;
    };

    let mut properties = Map::new();
    if let Some(id) = raw.id {
        properties.insert("id".to_string(), Value::String(id));
    }
    if let Some(result_type) = raw.result_type {
        properties.insert("type".to_string(), Value::String(result_type));
    }
    if let Some(score) = raw.score {
        properties.insert("score".to_string(), score.into());
    }
    if let Some(dist) = raw.dist {
        properties.insert("dist".to_string(), dist.into());
    }
    if let Some(entity_type) = raw.entity_type {
        properties.insert("entityType".to_string(), Value::String(entity_type));
    }
    if let Some(address) = raw.address {
        properties.insert("address".to_string(), address);
    }
    if let Some(poi) = raw.poi {
        properties.insert("poi".to_string(), poi);
    }

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::Point(vec![position.lon, position.lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchResponse {
    pub(crate) summary: Option<SearchSummary>,
    #[serde(default)]
    pub(crate) results: Vec<RawSearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSearchResult {
    pub(crate) id: Option<String>,
    #[serde(rename = "type")]
    pub(crate) result_type: Option<String>,
    pub(crate) score: Option<f64>,
    pub(crate) dist: Option<f64>,
    pub(crate) entity_type: Option<String>,
    pub(crate) position: Option<RawPosition>,
    pub(crate) address: Option<Value>,
    pub(crate) poi: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPosition {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}
