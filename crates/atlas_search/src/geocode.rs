//! Geocoding service
//!
//! Resolves address text to coordinates. Shares the result shape and
//! feature assembly with fuzzy search; the endpoint only matches addresses,
//! not POIs.

use atlas_core::{
    CommonParams, ErrorKind, FieldRule, GeoInput, GlobalConfig, JsonKind, MergeGlobalDefaults,
    RawResponse, Rule, Schema, WireRequest, encode_path_segment,
};
use serde::Serialize;

use crate::endpoint::{csv, service_url};
use crate::models::{SearchResponse, parse_search_body};

/// Parameters of a geocoding call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeParams {
    /// Common per-call parameters
    #[serde(flatten)]
    pub common: CommonParams,

    /// Address text to resolve
    pub query: String,

    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,

    /// Offset into the full result set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ofs: Option<u16>,

    /// ISO 3166-1 alpha-2/alpha-3 country filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_set: Option<Vec<String>>,

    /// Bias results around this location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoInput>,

    /// Constrain results to this radius around `center`, in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<u32>,
}

impl GeocodeParams {
    /// Parameters for geocoding `query` with all options unset
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            common: CommonParams::default(),
            query: query.into(),
            limit: None,
            ofs: None,
            country_set: None,
            center: None,
            radius_meters: None,
        }
    }
}

impl MergeGlobalDefaults for GeocodeParams {
    fn merge_defaults(&mut self, config: &GlobalConfig) {
        self.common.merge(config);
    }
}

/// Declarative constraints for geocoding parameters
pub static GEOCODE_SCHEMA: Schema = Schema {
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
            path: "countrySet",
            rule: Rule::ArrayOf(JsonKind::String),
        },
    ],
};

/// Build the wire request for a geocoding call
///
/// # Errors
///
/// [`ErrorKind::InvalidInput`] when `center` is not waypoint-shaped.
pub fn build_geocode_request(params: &GeocodeParams) -> Result<WireRequest, ErrorKind> {
    let mut url = service_url(
        &params.common,
        &format!(
            "/search/2/geocode/{}.json",
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
        if let Some(countries) = &params.country_set {
            query.append_pair("countrySet", &csv(countries));
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

/// Parse the geocoding payload
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize.
pub fn parse_geocode_response(
    response: RawResponse,
    _params: &GeocodeParams,
) -> Result<SearchResponse, ErrorKind> {
    parse_search_body(response.body)
}
