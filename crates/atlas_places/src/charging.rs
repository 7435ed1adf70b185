//! EV charging-point availability
//!
//! Flattens the upstream connector availability payload into typed counts
//! per connector type and power level.

use atlas_core::{
    CommonParams, ErrorKind, FieldRule, GlobalConfig, JsonKind, MergeGlobalDefaults, RawResponse,
    Rule, Schema, WireRequest,
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Parameters of a charging availability call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingAvailabilityParams {
    /// Common per-call parameters
    #[serde(flatten)]
    pub common: CommonParams,

    /// Availability id of the charging park, as returned by a search
    pub charging_availability: String,
}

impl ChargingAvailabilityParams {
    /// Parameters for the charging park identified by `id`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            common: CommonParams::default(),
            charging_availability: id.into(),
        }
    }
}

impl MergeGlobalDefaults for ChargingAvailabilityParams {
    fn merge_defaults(&mut self, config: &GlobalConfig) {
        self.common.merge(config);
    }
}

/// Declarative constraints for charging availability parameters
pub static CHARGING_AVAILABILITY_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            path: "chargingAvailability",
            rule: Rule::Required,
        },
        FieldRule {
            path: "chargingAvailability",
            rule: Rule::TypeOf(JsonKind::String),
        },
    ],
};

/// Availability of one charging park
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingAvailability {
    /// The queried availability id
    pub id: String,
    /// Per-connector-type availability
    pub connectors: Vec<ChargingConnector>,
}

/// Availability counts for one connector type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingConnector {
    /// Connector type (e.g. "IEC62196Type2Outlet")
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Total charging points of this type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    /// Current counts by state
    pub current: ConnectorCounts,
    /// Counts broken down by charging power
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_power_level: Option<Vec<PowerLevelCounts>>,
}

/// Counts of charging points by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorCounts {
    /// Free to use
    #[serde(default)]
    pub available: u32,
    /// In use
    #[serde(default)]
    pub occupied: u32,
    /// Reserved for someone
    #[serde(default)]
    pub reserved: u32,
    /// Broken or offline
    #[serde(default)]
    pub out_of_service: u32,
}

/// Counts of charging points at one power level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerLevelCounts {
    /// Charging power in kW
    #[serde(rename = "powerKW")]
    pub power_kw: f64,
    /// Counts by state at this power level
    #[serde(flatten)]
    pub counts: ConnectorCounts,
}

/// Build the wire request for a charging availability call
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when no base URL resolves (prevented by
/// validation in normal flow).
pub fn build_charging_availability_request(
    params: &ChargingAvailabilityParams,
) -> Result<WireRequest, ErrorKind> {
    let base = params
        .common
        .resolved_base_url()
        .ok_or_else(|| ErrorKind::Unexpected("no base URL resolved".to_string()))?;

    let mut url = Url::parse(&format!("{base}/search/2/chargingAvailability.json"))
        .map_err(|e| ErrorKind::Unexpected(e.to_string()))?;
    params.common.append_query(&mut url);
    url.query_pairs_mut()
        .append_pair("chargingAvailability", &params.charging_availability);

    Ok(WireRequest::get(url))
}

/// Parse the charging availability payload
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize.
pub fn parse_charging_availability_response(
    response: RawResponse,
    _params: &ChargingAvailabilityParams,
) -> Result<ChargingAvailability, ErrorKind> {
    let raw: RawChargingResponse = serde_json::from_value(response.body)
        .map_err(|e| ErrorKind::Unexpected(format!("malformed charging payload: {e}")))?;

    Ok(ChargingAvailability {
        id: raw.charging_availability,
        connectors: raw.connectors.into_iter().map(convert_connector).collect(),
    })
}

fn convert_connector(raw: RawConnector) -> ChargingConnector {
    let availability = raw.availability.unwrap_or_default();
    ChargingConnector {
        connector_type: raw.connector_type,
        total: raw.total,
        current: availability.current.unwrap_or_default(),
        per_power_level: availability
            .per_power_level
            .and_then(|per_level| per_level.current),
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChargingResponse {
    charging_availability: String,
    #[serde(default)]
    connectors: Vec<RawConnector>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConnector {
    #[serde(rename = "type")]
    connector_type: String,
    total: Option<u32>,
    availability: Option<RawAvailability>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAvailability {
    current: Option<ConnectorCounts>,
    per_power_level: Option<RawPerPowerLevel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerPowerLevel {
    current: Option<Vec<PowerLevelCounts>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn base_params() -> ChargingAvailabilityParams {
        let mut params = ChargingAvailabilityParams::new("0acf2345-1234-5678-9012-d64bb6d0b345");
        params.common.api_key = Some("abc".to_string());
        params.common.common_base_url = Some("https://api.example.com".to_string());
        params
    }

    #[test]
    fn test_id_in_query() {
        let request = build_charging_availability_request(&base_params()).unwrap();
        assert_eq!(request.url.path(), "/search/2/chargingAvailability.json");
        assert!(
            request
                .url
                .query()
                .unwrap_or_default()
                .contains("chargingAvailability=0acf2345")
        );
    }

    #[test]
    fn test_parse_connectors() {
        let body = json!({
            "chargingAvailability": "0acf2345-1234-5678-9012-d64bb6d0b345",
            "connectors": [{
                "type": "IEC62196Type2Outlet",
                "total": 4,
                "availability": {
                    "current": {
                        "available": 2,
                        "occupied": 1,
                        "reserved": 0,
                        "outOfService": 1
                    },
                    "perPowerLevel": {
                        "current": [
                            {"powerKW": 11.0, "available": 1, "occupied": 1},
                            {"powerKW": 22.0, "available": 1, "outOfService": 1}
                        ]
                    }
                }
            }]
        });

        let availability =
            parse_charging_availability_response(RawResponse { status: 200, body }, &base_params())
                .unwrap();

        assert_eq!(availability.id, "0acf2345-1234-5678-9012-d64bb6d0b345");
        assert_eq!(availability.connectors.len(), 1);

        let connector = &availability.connectors[0];
        assert_eq!(connector.connector_type, "IEC62196Type2Outlet");
        assert_eq!(connector.total, Some(4));
        assert_eq!(connector.current.available, 2);
        assert_eq!(connector.current.out_of_service, 1);

        let per_level = connector.per_power_level.as_deref().unwrap_or_default();
        assert_eq!(per_level.len(), 2);
        assert_eq!(per_level[1].counts.out_of_service, 1);
    }

    #[test]
    fn test_parse_connector_without_availability() {
        let body = json!({
            "chargingAvailability": "id",
            "connectors": [{"type": "Tesla"}]
        });
        let availability =
            parse_charging_availability_response(RawResponse { status: 200, body }, &base_params())
                .unwrap();
        assert_eq!(availability.connectors[0].current, ConnectorCounts::default());
        assert!(availability.connectors[0].per_power_level.is_none());
    }

    #[test]
    fn test_malformed_payload_is_unexpected() {
        let result = parse_charging_availability_response(
            RawResponse {
                status: 200,
                body: json!({"connectors": []}),
            },
            &base_params(),
        );
        assert!(matches!(result, Err(ErrorKind::Unexpected(_))));
    }
}
