//! Reverse geocoding service
//!
//! Resolves a coordinate to the nearest addresses. The parser also consumes
//! the original parameters: a result that arrives without its own position
//! falls back to the queried coordinate.

use atlas_core::{
    CommonParams, ErrorKind, FieldRule, GeoInput, GlobalConfig, MergeGlobalDefaults, RawResponse,
    Rule, Schema, WireRequest,
};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::endpoint::service_url;
use crate::models::{SearchResponse, SearchSummary};

/// Parameters of a reverse geocoding call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodeParams {
    /// Common per-call parameters
    #[serde(flatten)]
    pub common: CommonParams,

    /// The coordinate to resolve
    pub position: GeoInput,

    /// Search radius in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<u32>,

    /// Restrict results to one geography entity type (e.g. "Municipality")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Heading of travel along a road, in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u16>,
}

impl ReverseGeocodeParams {
    /// Parameters for reverse geocoding `position` with all options unset
    #[must_use]
    pub fn new(position: impl Into<GeoInput>) -> Self {
        Self {
            common: CommonParams::default(),
            position: position.into(),
            radius_meters: None,
            entity_type: None,
            heading: None,
        }
    }
}

impl MergeGlobalDefaults for ReverseGeocodeParams {
    fn merge_defaults(&mut self, config: &GlobalConfig) {
        self.common.merge(config);
    }
}

/// Declarative constraints for reverse geocoding parameters
pub static REVERSE_GEOCODE_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            path: "position",
            rule: Rule::Required,
        },
        FieldRule {
            path: "heading",
            rule: Rule::Range {
                min: 0.0,
                max: 360.0,
            },
        },
    ],
};

/// Build the wire request for a reverse geocoding call
///
/// # Errors
///
/// [`ErrorKind::InvalidInput`] when `position` is not waypoint-shaped.
pub fn build_reverse_geocode_request(
    params: &ReverseGeocodeParams,
) -> Result<WireRequest, ErrorKind> {
    let pair = params.position.coordinate_pair()?;
    let mut url = service_url(
        &params.common,
        &format!("/search/2/reverseGeocode/{},{}.json", pair[1], pair[0]),
    )?;

    let mut query = url.query_pairs_mut();
    if let Some(radius) = params.radius_meters {
        query.append_pair("radius", &radius.to_string());
    }
    if let Some(entity_type) = &params.entity_type {
        query.append_pair("entityType", entity_type);
    }
    if let Some(heading) = params.heading {
        query.append_pair("heading", &heading.to_string());
    }
    drop(query);

    Ok(WireRequest::get(url))
}

/// Parse the reverse geocoding payload into address features
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize.
pub fn parse_reverse_geocode_response(
    response: RawResponse,
    params: &ReverseGeocodeParams,
) -> Result<SearchResponse, ErrorKind> {
    let raw: RawReverseGeocodeResponse = serde_json::from_value(response.body)
        .map_err(|e| ErrorKind::Unexpected(format!("malformed reverse geocode payload: {e}")))?;

    // The queried coordinate backs any result the API returns positionless
    let fallback = params.position.coordinate_pair().ok();

    let features = raw
        .addresses
        .into_iter()
        .filter_map(|address| address_to_feature(address, fallback))
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

fn address_to_feature(raw: RawReverseGeocodeAddress, fallback: Option<[f64; 2]>) -> Option<Feature> {
    let position = raw
        .position
        .as_deref()
        .and_then(parse_lat_lon_pair)
        .or(fallback)?;

    let mut properties = Map::new();
    if let Some(address) = raw.address {
        properties.insert("address".to_string(), address);
    }
    if let Some(match_type) = raw.match_type {
        properties.insert("matchType".to_string(), Value::String(match_type));
    }

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::Point(vec![position[0], position[1]]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Parse the API's `"lat,lon"` position string into `[lon, lat]`
fn parse_lat_lon_pair(text: &str) -> Option<[f64; 2]> {
    let (lat, lon) = text.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    Some([lon, lat])
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawReverseGeocodeResponse {
    summary: Option<SearchSummary>,
    #[serde(default)]
    addresses: Vec<RawReverseGeocodeAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReverseGeocodeAddress {
    address: Option<Value>,
    position: Option<String>,
    match_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn base_params() -> ReverseGeocodeParams {
        let mut params = ReverseGeocodeParams::new([4.90943, 52.37727]);
        params.common.api_key = Some("abc".to_string());
        params.common.common_base_url = Some("https://api.example.com".to_string());
        params
    }

    #[test]
    fn test_position_embedded_as_lat_lon() {
        let request = build_reverse_geocode_request(&base_params()).unwrap();
        assert_eq!(
            request.url.path(),
            "/search/2/reverseGeocode/52.37727,4.90943.json"
        );
    }

    #[test]
    fn test_path_position_is_invalid_input() {
        let mut params = base_params();
        params.position = GeoInput::from(vec![[1.0, 2.0], [3.0, 4.0]]);
        let error = build_reverse_geocode_request(&params).unwrap_err();
        assert!(matches!(error, ErrorKind::InvalidInput(_)));
    }

    #[test]
    fn test_parse_addresses() {
        let body = json!({
            "summary": {"queryTime": 12, "numResults": 1},
            "addresses": [{
                "address": {"freeformAddress": "De Ruijterkade 154, Amsterdam"},
                "position": "52.37727,4.90943",
                "matchType": "AddressPoint"
            }]
        });
        let response = parse_reverse_geocode_response(
            RawResponse { status: 200, body },
            &base_params(),
        )
        .unwrap();

        assert_eq!(response.len(), 1);
        let feature = &response.results.features[0];
        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(GeoValue::Point(position)) => {
                assert_eq!(position, &vec![4.90943, 52.37727]);
            }
            other => panic!("expected Point, got {other:?}"),
        }
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["matchType"], json!("AddressPoint"));
    }

    #[test]
    fn test_positionless_address_falls_back_to_query() {
        let body = json!({
            "addresses": [{
                "address": {"freeformAddress": "Somewhere"}
            }]
        });
        let response = parse_reverse_geocode_response(
            RawResponse { status: 200, body },
            &base_params(),
        )
        .unwrap();

        let feature = &response.results.features[0];
        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(GeoValue::Point(position)) => {
                // The queried coordinate, as [lon, lat]
                assert_eq!(position, &vec![4.90943, 52.37727]);
            }
            other => panic!("expected Point, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_lat_lon_pair() {
        assert_eq!(parse_lat_lon_pair("52.3,4.9"), Some([4.9, 52.3]));
        assert_eq!(parse_lat_lon_pair("52.3, 4.9"), Some([4.9, 52.3]));
        assert_eq!(parse_lat_lon_pair("garbage"), None);
        assert_eq!(parse_lat_lon_pair("1,notanumber"), None);
    }
}
