//! Fuzzy search service
//!
//! Free-form search over addresses, POIs and geographies, with typeahead
//! support and optional geo-biasing around a center point.

use atlas_core::{
    CommonParams, ErrorKind, FieldRule, GeoInput, GlobalConfig, JsonKind, MergeGlobalDefaults,
    RawResponse, Rule, Schema, WireRequest, encode_path_segment,
};
use serde::Serialize;

use crate::endpoint::{csv, service_url};
use crate::models::{SearchResponse, parse_search_body};

/// Parameters of a fuzzy search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuzzySearchParams {
    /// Common per-call parameters
    #[serde(flatten)]
    pub common: CommonParams,

    /// Free-form query text
    pub query: String,

    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,

    /// Offset into the full result set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ofs: Option<u16>,

    /// Treat the query as a partial input being typed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typeahead: Option<bool>,

    /// ISO 3166-1 alpha-2/alpha-3 country filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_set: Option<Vec<String>>,

    /// Bias results around this location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoInput>,

    /// Constrain results to this radius around `center`, in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<u32>,

    /// Indexes to query (e.g. "PAD", "POI", "Geo")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx_set: Option<Vec<String>>,

    /// Minimum fuzziness level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fuzzy_level: Option<u8>,

    /// Maximum fuzziness level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fuzzy_level: Option<u8>,
}

impl FuzzySearchParams {
    /// Parameters for a fuzzy search of `query` with all options unset
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            common: CommonParams::default(),
            query: query.into(),
            limit: None,
            ofs: None,
            typeahead: None,
            country_set: None,
            center: None,
            radius_meters: None,
            idx_set: None,
            min_fuzzy_level: None,
            max_fuzzy_level: None,
        }
    }
}

impl MergeGlobalDefaults for FuzzySearchParams {
    fn merge_defaults(&mut self, config: &GlobalConfig) {
        self.common.merge(config);
    }
}

/// Declarative constraints for fuzzy search parameters
pub static FUZZY_SEARCH_SCHEMA: Schema = Schema {
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
            path: "limit",
            rule: Rule::Range {
                min: 1.0,
                max: 100.0,
            },
        },
        FieldRule {
            path: "ofs",
            rule: Rule::Range {
                min: 0.0,
                max: 1900.0,
            },
        },
        FieldRule {
            path: "typeahead",
            rule: Rule::TypeOf(JsonKind::Bool),
        },
        FieldRule {
            path: "countrySet",
            rule: Rule::ArrayOf(JsonKind::String),
        },
        FieldRule {
            path: "minFuzzyLevel",
            rule: Rule::Range { min: 1.0, max: 4.0 },
        },
        FieldRule {
            path: "maxFuzzyLevel",
            rule: Rule::Range { min: 1.0, max: 4.0 },
        },
    ],
};

/// Build the wire request for a fuzzy search
///
/// # Errors
///
/// [`ErrorKind::InvalidInput`] when `center` is not waypoint-shaped.
pub fn build_fuzzy_search_request(
    params: &FuzzySearchParams,
) -> Result<WireRequest, ErrorKind> {
    let mut url = service_url(
        &params.common,
        &format!(
            "/search/2/search/{}.json",
            encode_path_segment(&params.query)
        ),
    )?;

    {
        let mut query = url.query_pairs_mut();
        if let Some(limit) = params.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(ofs) = params.ofs {
            query.append_pair("ofs", &ofs.to_string());
        }
        if let Some(typeahead) = params.typeahead {
            query.append_pair("typeahead", if typeahead { "true" } else { "false" });
        }
        if let Some(countries) = &params.country_set {
            query.append_pair("countrySet", &csv(countries));
        }
        if let Some(idx_set) = &params.idx_set {
            query.append_pair("idxSet", &csv(idx_set));
        }
        if let Some(min_fuzzy_level) = params.min_fuzzy_level {
            query.append_pair("minFuzzyLevel", &min_fuzzy_level.to_string());
        }
        if let Some(max_fuzzy_level) = params.max_fuzzy_level {
            query.append_pair("maxFuzzyLevel", &max_fuzzy_level.to_string());
        }
        if let Some(radius) = params.radius_meters {
            query.append_pair("radius", &radius.to_string());
        }
    }

    if let Some(center) = &params.center {
        let pair = center.coordinate_pair()?;
        let mut query = url.query_pairs_mut();
        query.append_pair("lat", &pair[1].to_string());
        query.append_pair("lon", &pair[0].to_string());
    }

    Ok(WireRequest::get(url))
}

/// Parse the fuzzy search payload
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize.
pub fn parse_fuzzy_search_response(
    response: RawResponse,
    _params: &FuzzySearchParams,
) -> Result<SearchResponse, ErrorKind> {
    parse_search_body(response.body)
}
