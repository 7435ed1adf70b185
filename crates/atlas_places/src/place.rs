//! Place lookup by entity id
//!
//! Fetches the full detail of one previously returned search result. The
//! upstream payload has the search-family result shape with at most one
//! entry.

use atlas_core::{
    CommonParams, ErrorKind, FieldRule, GlobalConfig, JsonKind, MergeGlobalDefaults, RawResponse,
    Rule, Schema, WireRequest,
};
use atlas_search::parse_search_body;
use geojson::Feature;
use serde::Serialize;
use url::Url;

/// Parameters of a place lookup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceByIdParams {
    /// Common per-call parameters
    #[serde(flatten)]
    pub common: CommonParams,

    /// Entity id of the place, as returned by a search
    pub entity_id: String,
}

impl PlaceByIdParams {
    /// Parameters for looking up `entity_id`
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            common: CommonParams::default(),
            entity_id: entity_id.into(),
        }
    }
}

impl MergeGlobalDefaults for PlaceByIdParams {
    fn merge_defaults(&mut self, config: &GlobalConfig) {
        self.common.merge(config);
    }
}

/// Declarative constraints for place lookup parameters
pub static PLACE_BY_ID_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            path: "entityId",
            rule: Rule::Required,
        },
        FieldRule {
            path: "entityId",
            rule: Rule::TypeOf(JsonKind::String),
        },
    ],
};

/// The looked-up place
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResponse {
    /// The place as a GeoJSON Point feature; `None` when the id matched
    /// nothing
    pub place: Option<Feature>,
}

/// Build the wire request for a place lookup
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when no base URL resolves (prevented by
/// validation in normal flow).
pub fn build_place_by_id_request(params: &PlaceByIdParams) -> Result<WireRequest, ErrorKind> {
    let base = params
        .common
        .resolved_base_url()
        .ok_or_else(|| ErrorKind::Unexpected("no base URL resolved".to_string()))?;

    let mut url = Url::parse(&format!("{base}/search/2/place.json"))
        .map_err(|e| ErrorKind::Unexpected(e.to_string()))?;
    params.common.append_query(&mut url);
    url.query_pairs_mut()
        .append_pair("entityId", &params.entity_id);

    Ok(WireRequest::get(url))
}

/// Parse the place lookup payload
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize.
pub fn parse_place_by_id_response(
    response: RawResponse,
    _params: &PlaceByIdParams,
) -> Result<PlaceResponse, ErrorKind> {
    let results = parse_search_body(response.body)?;
    Ok(PlaceResponse {
        place: results.results.features.into_iter().next(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn base_params() -> PlaceByIdParams {
        let mut params = PlaceByIdParams::new("NL/PAD/p0/123");
        params.common.api_key = Some("abc".to_string());
        params.common.common_base_url = Some("https://api.example.com".to_string());
        params
    }

    #[test]
    fn test_entity_id_in_query() {
        let request = build_place_by_id_request(&base_params()).unwrap();
        assert_eq!(request.url.path(), "/search/2/place.json");
        assert!(
            request
                .url
                .query()
                .unwrap_or_default()
                .contains("entityId=NL%2FPAD%2Fp0%2F123")
        );
    }

    #[test]
    fn test_parse_single_result() {
        let body = json!({
            "summary": {"numResults": 1},
            "results": [{
                "id": "NL/PAD/p0/123",
                "position": {"lat": 52.37727, "lon": 4.90943},
                "address": {"freeformAddress": "De Ruijterkade 154"}
            }]
        });
        let response =
            parse_place_by_id_response(RawResponse { status: 200, body }, &base_params()).unwrap();

        let place = response.place.unwrap();
        let properties = place.properties.unwrap();
        assert_eq!(properties["id"], json!("NL/PAD/p0/123"));
    }

    #[test]
    fn test_parse_no_result() {
        let body = json!({"summary": {"numResults": 0}, "results": []});
        let response =
            parse_place_by_id_response(RawResponse { status: 200, body }, &base_params()).unwrap();
        assert!(response.place.is_none());
    }
}
