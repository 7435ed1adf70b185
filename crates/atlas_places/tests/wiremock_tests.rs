//! Integration tests for the places services (wiremock-based)

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atlas_core::{GlobalConfig, HttpTransport, ServiceName};
use atlas_places::{
    ChargingAvailabilityParams, PlaceByIdParams, charging_availability, place_by_id,
};

fn config_for_mock(base_url: &str) -> GlobalConfig {
    GlobalConfig {
        common_base_url: Some(base_url.to_string()),
        ..GlobalConfig::for_testing()
    }
}

#[tokio::test]
async fn test_place_by_id_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/2/place.json"))
        .and(query_param("entityId", "NL/PAD/p0/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": {"numResults": 1},
            "results": [{
                "id": "NL/PAD/p0/123",
                "type": "Point Address",
                "position": {"lat": 52.37727, "lon": 4.90943},
                "address": {"freeformAddress": "De Ruijterkade 154, Amsterdam"}
            }]
        })))
        .mount(&server)
        .await;

    let config = config_for_mock(&server.uri());
    let transport = HttpTransport::new(&config).unwrap();

    let response = place_by_id(&transport, &config, PlaceByIdParams::new("NL/PAD/p0/123"))
        .await
        .unwrap();

    let place = response.place.unwrap();
    assert_eq!(
        place.properties.unwrap()["address"]["freeformAddress"],
        json!("De Ruijterkade 154, Amsterdam")
    );
}

#[tokio::test]
async fn test_place_by_id_unknown_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/2/place.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": {"numResults": 0},
            "results": []
        })))
        .mount(&server)
        .await;

    let config = config_for_mock(&server.uri());
    let transport = HttpTransport::new(&config).unwrap();

    let response = place_by_id(&transport, &config, PlaceByIdParams::new("bogus"))
        .await
        .unwrap();

    assert!(response.place.is_none());
}

#[tokio::test]
async fn test_charging_availability_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/2/chargingAvailability.json"))
        .and(query_param("chargingAvailability", "station-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chargingAvailability": "station-1",
            "connectors": [{
                "type": "IEC62196Type2CCS",
                "total": 2,
                "availability": {
                    "current": {"available": 1, "occupied": 1, "reserved": 0, "outOfService": 0}
                }
            }]
        })))
        .mount(&server)
        .await;

    let config = config_for_mock(&server.uri());
    let transport = HttpTransport::new(&config).unwrap();

    let availability = charging_availability(
        &transport,
        &config,
        ChargingAvailabilityParams::new("station-1"),
    )
    .await
    .unwrap();

    assert_eq!(availability.id, "station-1");
    assert_eq!(availability.connectors[0].current.available, 1);
}

#[tokio::test]
async fn test_charging_error_normalization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/2/chargingAvailability.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detailedError": {"code": "NotFound", "message": "no such station"}
        })))
        .mount(&server)
        .await;

    let config = config_for_mock(&server.uri());
    let transport = HttpTransport::new(&config).unwrap();

    let error = charging_availability(
        &transport,
        &config,
        ChargingAvailabilityParams::new("bogus"),
    )
    .await
    .unwrap_err();

    assert_eq!(error.service, ServiceName::ChargingAvailability);
    assert_eq!(error.status(), Some(404));
    assert!(error.to_string().contains("no such station"));
}
