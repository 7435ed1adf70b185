//! Cross-service integration tests for the Atlas client (wiremock-based)

use serde_json::json;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atlas::{
    Atlas, ChargingAvailabilityParams, FuzzySearchParams, GeoInput, GeocodeParams,
    GeometrySearchParams, GlobalConfig, PlaceByIdParams, ReverseGeocodeParams, RouteParams,
    SearchGeometry, ServiceName,
};

fn client_for_mock(base_url: &str) -> Atlas {
    Atlas::new(GlobalConfig {
        common_base_url: Some(base_url.to_string()),
        ..GlobalConfig::for_testing()
    })
    .expect("client")
}

/// Every service funnels a simulated upstream 403 into the same normalized
/// error shape, regardless of which family normalizer ran.
#[tokio::test]
async fn test_uniform_403_normalization_across_services() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(".*"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Forbidden",
            "errorText": "Forbidden",
            "error": {"description": "Forbidden"},
            "detailedError": {"message": "Forbidden"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(".*"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errorText": "Forbidden",
            "error": {"description": "Forbidden"}
        })))
        .mount(&server)
        .await;

    let atlas = client_for_mock(&server.uri());

    let locations = vec![
        GeoInput::from([4.89066, 52.37317]),
        GeoInput::from([4.49015, 52.16109]),
    ];

    let failures = vec![
        (
            ServiceName::Routing,
            atlas
                .calculate_route(RouteParams::new(locations))
                .await
                .map(|_| ())
                .unwrap_err(),
        ),
        (
            ServiceName::Geocode,
            atlas
                .geocode(GeocodeParams::new("amsterdam"))
                .await
                .map(|_| ())
                .unwrap_err(),
        ),
        (
            ServiceName::ReverseGeocode,
            atlas
                .reverse_geocode(ReverseGeocodeParams::new([4.9, 52.3]))
                .await
                .map(|_| ())
                .unwrap_err(),
        ),
        (
            ServiceName::FuzzySearch,
            atlas
                .fuzzy_search(FuzzySearchParams::new("pub"))
                .await
                .map(|_| ())
                .unwrap_err(),
        ),
        (
            ServiceName::GeometrySearch,
            atlas
                .geometry_search(GeometrySearchParams::new(
                    "pizza",
                    vec![SearchGeometry::circle([4.9, 52.3], 500)],
                ))
                .await
                .map(|_| ())
                .unwrap_err(),
        ),
        (
            ServiceName::PlaceById,
            atlas
                .place_by_id(PlaceByIdParams::new("id"))
                .await
                .map(|_| ())
                .unwrap_err(),
        ),
        (
            ServiceName::ChargingAvailability,
            atlas
                .charging_availability(ChargingAvailabilityParams::new("id"))
                .await
                .map(|_| ())
                .unwrap_err(),
        ),
    ];

    for (service, error) in failures {
        assert_eq!(error.service, service);
        assert_eq!(error.status(), Some(403), "service {service}");
        assert!(error.to_string().contains("Forbidden"), "service {service}");
    }
}

#[tokio::test]
async fn test_end_to_end_geocode_then_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/search/2/geocode/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": {"numResults": 1},
            "results": [{
                "id": "NL/PAD/p0/123",
                "position": {"lat": 52.37727, "lon": 4.90943},
                "address": {"freeformAddress": "De Ruijterkade 154"}
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/routing/1/calculateRoute/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routes": [{
                "summary": {
                    "lengthInMeters": 1000,
                    "travelTimeInSeconds": 300,
                    "departureTime": "2026-02-11T10:00:00+01:00",
                    "arrivalTime": "2026-02-11T10:05:00+01:00"
                },
                "legs": [{
                    "summary": {
                        "lengthInMeters": 1000,
                        "travelTimeInSeconds": 300,
                        "departureTime": "2026-02-11T10:00:00+01:00",
                        "arrivalTime": "2026-02-11T10:05:00+01:00"
                    },
                    "points": [
                        {"latitude": 52.37727, "longitude": 4.90943},
                        {"latitude": 52.37317, "longitude": 4.89066}
                    ]
                }]
            }]
        })))
        .mount(&server)
        .await;

    let atlas = client_for_mock(&server.uri());

    // Geocode, then route from the geocoded feature to a fixed point
    let geocoded = atlas
        .geocode(GeocodeParams::new("De Ruijterkade 154, Amsterdam"))
        .await
        .unwrap();
    let origin = geocoded.results.features[0].clone();

    let routes = atlas
        .calculate_route(RouteParams::new(vec![
            GeoInput::from(origin),
            GeoInput::from([4.89066, 52.37317]),
        ]))
        .await
        .unwrap();

    assert_eq!(routes.routes.len(), 1);
    let feature_collection = routes.into_feature_collection();
    assert_eq!(feature_collection.features.len(), 1);
}
