//! Geometry search service
//!
//! Searches inside caller-supplied areas: circles around a point and
//! polygons. The geometry list travels in a POST body; results share the
//! fuzzy-search feature assembly.

use atlas_core::{
    CommonParams, ErrorKind, FieldRule, GlobalConfig, JsonKind, LonLat, MergeGlobalDefaults,
    RawResponse, Rule, Schema, WireRequest, encode_path_segment,
};
use serde::Serialize;
use serde_json::json;

use crate::endpoint::service_url;
use crate::models::{SearchResponse, parse_search_body};

/// A search area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SearchGeometry {
    /// A circle around a center point
    #[serde(rename = "CIRCLE", rename_all = "camelCase")]
    Circle {
        /// Center as a `"lat,lon"` string
        position: String,
        /// Radius in meters
        radius: u32,
    },
    /// A polygon
    #[serde(rename = "POLYGON", rename_all = "camelCase")]
    Polygon {
        /// Vertices as `"lat,lon"` strings
        vertices: Vec<String>,
    },
}

impl SearchGeometry {
    /// A circle around `center` (`[lon, lat]`) with `radius_meters`
    #[must_use]
    pub fn circle(center: LonLat, radius_meters: u32) -> Self {
        Self::Circle {
            position: format!("{},{}", center[1], center[0]),
            radius: radius_meters,
        }
    }

    /// A polygon through `vertices` (`[lon, lat]` each)
    #[must_use]
    pub fn polygon(vertices: &[LonLat]) -> Self {
        Self::Polygon {
            vertices: vertices
                .iter()
                .map(|pair| format!("{},{}", pair[1], pair[0]))
                .collect(),
        }
    }
}

/// Parameters of a geometry search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometrySearchParams {
    /// Common per-call parameters
    #[serde(flatten)]
    pub common: CommonParams,

    /// Free-form query text
    pub query: String,

    /// Areas to search within
    pub geometry_list: Vec<SearchGeometry>,

    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,

    /// Indexes to query (e.g. "PAD", "POI", "Geo")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx_set: Option<Vec<String>>,
}

impl GeometrySearchParams {
    /// Parameters for searching `query` inside `geometry_list`
    #[must_use]
    pub fn new(query: impl Into<String>, geometry_list: Vec<SearchGeometry>) -> Self {
        Self {
            common: CommonParams::default(),
            query: query.into(),
            geometry_list,
            limit: None,
            idx_set: None,
        }
    }
}

impl MergeGlobalDefaults for GeometrySearchParams {
    fn merge_defaults(&mut self, config: &GlobalConfig) {
        self.common.merge(config);
    }
}

/// Declarative constraints for geometry search parameters
pub static GEOMETRY_SEARCH_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            path: "query",
            rule: Rule::Required,
        },
        FieldRule {
            path: "query",
            rule: Rule::TypeOf(JsonKind::String),
        },
        FieldRule {
            path: "geometryList",
            rule: Rule::Required,
        },
        FieldRule {
            path: "geometryList",
            rule: Rule::MinItems(1),
        },
        FieldRule {
            path: "limit",
            rule: Rule::Range {
                min: 1.0,
                max: 100.0,
            },
        },
    ],
};

/// Build the wire request for a geometry search
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when no base URL resolves (prevented by
/// validation in normal flow).
pub fn build_geometry_search_request(
    params: &GeometrySearchParams,
) -> Result<WireRequest, ErrorKind> {
    let mut url = service_url(
        &params.common,
        &format!(
            "/search/2/geometrySearch/{}.json",
            encode_path_segment(&params.query)
        ),
    )?;

    {
        let mut query = url.query_pairs_mut();
        if let Some(limit) = params.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(idx_set) = &params.idx_set {
            query.append_pair("idxSet", &crate::endpoint::csv(idx_set));
        }
    }

    let body = json!({ "geometryList": params.geometry_list });
    Ok(WireRequest::post(url, body))
}

/// Parse the geometry search payload
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize.
pub fn parse_geometry_search_response(
    response: RawResponse,
    _params: &GeometrySearchParams,
) -> Result<SearchResponse, ErrorKind> {
    parse_search_body(response.body)
}
