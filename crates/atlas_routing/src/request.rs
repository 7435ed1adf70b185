//! Routing request builder
//!
//! Turns [`RouteParams`] into a wire request, choosing the simplest form
//! that suffices: a pure GET with the waypoints embedded in the URL path
//! when every location is a point, a POST with supporting points when any
//! location is a path to reconstruct or a route to embed.

use atlas_core::{ErrorKind, InputShapeError, WireRequest};
use serde_json::json;
use url::Url;

use crate::locations::{Linearized, RouteLocation, linearize};
use crate::models::SectionType;
use crate::params::{ConsumptionModel, RouteParams, RouteType, SpeedConsumption, VehicleParams, When};

/// Build the wire request for a route calculation
///
/// # Errors
///
/// [`ErrorKind::InvalidInput`] for malformed coordinates inside `locations`;
/// everything else was already caught by the validator.
pub fn build_route_request(params: &RouteParams) -> Result<WireRequest, ErrorKind> {
    let locations = params
        .locations
        .iter()
        .map(RouteLocation::classify)
        .collect::<Result<Vec<_>, _>>()?;

    // Origin and destination must be exact; only interior waypoints may
    // carry a radius
    for endpoint in [locations.first(), locations.last()].into_iter().flatten() {
        if endpoint.radius().is_some() {
            return Err(InputShapeError(
                "origin and destination must be exact waypoints".to_string(),
            )
            .into());
        }
    }

    let all_points = locations
        .iter()
        .all(|location| matches!(location, RouteLocation::Point(_)));

    let (path_segment, body) = if all_points {
        let segments = locations
            .iter()
            .map(point_segment)
            .collect::<Result<Vec<_>, _>>()?;
        (segments.join(":"), None)
    } else {
        let linearized = linearize(&locations)?;
        (endpoints_segment(&linearized)?, Some(post_body(&linearized)))
    };

    let base = params
        .common
        .resolved_base_url()
        .ok_or_else(|| ErrorKind::Unexpected("no base URL resolved".to_string()))?;

    let mut url = Url::parse(&format!(
        "{base}/routing/1/calculateRoute/{path_segment}/json"
    ))
    .map_err(|e| ErrorKind::Unexpected(e.to_string()))?;

    params.common.append_query(&mut url);
    append_routing_query(params, &mut url);
    if let Some(vehicle) = &params.vehicle {
        append_vehicle_query(vehicle, &mut url);
    }

    Ok(match body {
        Some(body) => WireRequest::post(url, body),
        None => WireRequest::get(url),
    })
}

/// `lat,lon` or `circle(lat,lon,radius)` for one point waypoint
fn point_segment(location: &RouteLocation) -> Result<String, InputShapeError> {
    let pair = location.points()?.first().copied().ok_or_else(|| {
        InputShapeError("point waypoint without coordinates".to_string())
    })?;
    let (lon, lat) = (pair[0], pair[1]);

    Ok(match location.radius() {
        Some(radius) => format!("circle({lat},{lon},{radius})"),
        None => format!("{lat},{lon}"),
    })
}

/// The resolved start/end `lat,lon:lat,lon` pair of a POST-mode request
fn endpoints_segment(linearized: &Linearized) -> Result<String, InputShapeError> {
    match (
        linearized.supporting_points.first(),
        linearized.supporting_points.last(),
    ) {
        (Some(first), Some(last)) => Ok(format!(
            "{},{}:{},{}",
            first.latitude, first.longitude, last.latitude, last.longitude
        )),
        _ => Err(InputShapeError(
            "locations produced no coordinates".to_string(),
        )),
    }
}

fn post_body(linearized: &Linearized) -> serde_json::Value {
    let mut body = json!({ "supportingPoints": linearized.supporting_points });
    if !linearized.point_waypoints.is_empty() {
        let waypoints: Vec<_> = linearized
            .point_waypoints
            .iter()
            .map(|index| {
                json!({
                    "supportingPointIndex": index,
                    "waypointSourceType": "USER_DEFINED",
                })
            })
            .collect();
        body["pointWaypoints"] = json!(waypoints);
    }
    body
}

fn append_routing_query(params: &RouteParams, url: &mut Url) {
    let mut query = url.query_pairs_mut();

    if let Some(avoid) = &params.avoid {
        for value in avoid {
            query.append_pair("avoid", value.as_str());
        }
    }
    if let Some(traffic) = params.traffic {
        query.append_pair("traffic", bool_str(traffic));
    }
    if let Some(heading) = params.heading {
        query.append_pair("vehicleHeading", &heading.to_string());
    }
    match params.when {
        Some(When::DepartAt(instant)) => {
            query.append_pair("departAt", &instant.to_rfc3339());
        }
        Some(When::ArriveBy(instant)) => {
            query.append_pair("arriveAt", &instant.to_rfc3339());
        }
        None => {}
    }
    if let Some(instructions_type) = params.instructions_type {
        query.append_pair("instructionsType", instructions_type.as_str());
    }
    if let Some(max_alternatives) = params.max_alternatives {
        query.append_pair("maxAlternatives", &max_alternatives.to_string());
    }
    if let Some(representation) = params.route_representation {
        query.append_pair("routeRepresentation", representation.as_str());
    }
    if let Some(route_type) = params.route_type {
        query.append_pair("routeType", route_type.as_str());
    }

    // Tri-state: unset emits the full fixed list, an explicit empty list
    // emits nothing, a subset exactly that subset
    match &params.section_types {
        None => {
            for kind in SectionType::ALL {
                query.append_pair("sectionType", kind.query_value());
            }
        }
        Some(kinds) => {
            for kind in kinds {
                query.append_pair("sectionType", kind.query_value());
            }
        }
    }

    if let Some(compute) = params.compute_travel_time_for {
        query.append_pair("computeTravelTimeFor", compute.as_str());
    }
    if let Some(mode) = params.travel_mode {
        query.append_pair("travelMode", mode.as_str());
    }

    // Thrilling-only shaping parameters
    if params.route_type == Some(RouteType::Thrilling) {
        if let Some(hilliness) = params.hilliness {
            query.append_pair("hilliness", hilliness.as_str());
        }
        if let Some(windingness) = params.windingness {
            query.append_pair("windingness", windingness.as_str());
        }
    }
}

fn append_vehicle_query(vehicle: &VehicleParams, url: &mut Url) {
    let mut query = url.query_pairs_mut();

    if let Some(max_speed) = vehicle.max_speed_kmh {
        query.append_pair("vehicleMaxSpeed", &max_speed.to_string());
    }
    if let Some(weight) = vehicle.weight_kg {
        query.append_pair("vehicleWeight", &weight.to_string());
    }
    if let Some(axle_weight) = vehicle.axle_weight_kg {
        query.append_pair("vehicleAxleWeight", &axle_weight.to_string());
    }
    if let Some(length) = vehicle.length_meters {
        query.append_pair("vehicleLength", &length.to_string());
    }
    if let Some(width) = vehicle.width_meters {
        query.append_pair("vehicleWidth", &width.to_string());
    }
    if let Some(height) = vehicle.height_meters {
        query.append_pair("vehicleHeight", &height.to_string());
    }
    if let Some(load_types) = &vehicle.load_type {
        for load_type in load_types {
            query.append_pair("vehicleLoadType", load_type.as_str());
        }
    }
    if let Some(adr) = vehicle.adr_tunnel_restriction_code {
        query.append_pair("vehicleAdrTunnelRestrictionCode", adr.as_str());
    }
    if let Some(commercial) = vehicle.commercial {
        query.append_pair("vehicleCommercial", bool_str(commercial));
    }

    match &vehicle.consumption {
        Some(ConsumptionModel::Combustion {
            constant_speed_consumption,
            current_fuel_liters,
            auxiliary_power_liters_per_hour,
            fuel_energy_density_mjoules_per_liter,
        }) => {
            query.append_pair(
                "constantSpeedConsumptionInLitersPerHundredkm",
                &consumption_curve(constant_speed_consumption),
            );
            if let Some(fuel) = current_fuel_liters {
                query.append_pair("currentFuelInLiters", &fuel.to_string());
            }
            if let Some(aux) = auxiliary_power_liters_per_hour {
                query.append_pair("auxiliaryPowerInLitersPerHour", &aux.to_string());
            }
            if let Some(density) = fuel_energy_density_mjoules_per_liter {
                query.append_pair("fuelEnergyDensityInMJoulesPerLiter", &density.to_string());
            }
        }
        Some(ConsumptionModel::Electric {
            constant_speed_consumption,
            current_charge_kwh,
            max_charge_kwh,
            auxiliary_power_kw,
        }) => {
            query.append_pair(
                "constantSpeedConsumptionInkWhPerHundredkm",
                &consumption_curve(constant_speed_consumption),
            );
            if let Some(charge) = current_charge_kwh {
                query.append_pair("currentChargeInkWh", &charge.to_string());
            }
            if let Some(max_charge) = max_charge_kwh {
                query.append_pair("maxChargeInkWh", &max_charge.to_string());
            }
            if let Some(aux) = auxiliary_power_kw {
                query.append_pair("auxiliaryPowerInkW", &aux.to_string());
            }
        }
        None => {}
    }

    if let Some(efficiency) = vehicle.acceleration_efficiency {
        query.append_pair("accelerationEfficiency", &efficiency.to_string());
    }
    if let Some(efficiency) = vehicle.deceleration_efficiency {
        query.append_pair("decelerationEfficiency", &efficiency.to_string());
    }
    if let Some(efficiency) = vehicle.uphill_efficiency {
        query.append_pair("uphillEfficiency", &efficiency.to_string());
    }
    if let Some(efficiency) = vehicle.downhill_efficiency {
        query.append_pair("downhillEfficiency", &efficiency.to_string());
    }
}

/// `speed,consumption` pairs joined by `:`
fn consumption_curve(points: &[SpeedConsumption]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.speed_kmh, point.consumption))
        .collect::<Vec<_>>()
        .join(":")
}

/// Convert bool to "true"/"false" str for query params
const fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use atlas_core::{GeoInput, soft_waypoint};
    use chrono::DateTime;
    use geojson::{Feature, Geometry, Value as GeoValue};
    use serde_json::json;

    use super::*;
    use crate::params::{Avoid, Hilliness};

    fn base_params(locations: Vec<GeoInput>) -> RouteParams {
        let mut params = RouteParams::new(locations);
        params.common.api_key = Some("abc".to_string());
        params.common.common_base_url = Some("https://api.example.com".to_string());
        params
    }

    fn two_waypoints() -> Vec<GeoInput> {
        vec![
            GeoInput::from([4.89066, 52.37317]),
            GeoInput::from([4.49015, 52.16109]),
        ]
    }

    fn query_values(url: &Url, name: &str) -> Vec<String> {
        url.query_pairs()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .collect()
    }

    #[test]
    fn test_point_waypoints_build_get_request() {
        let request = build_route_request(&base_params(two_waypoints())).unwrap();

        assert!(!request.is_post());
        assert!(request.url.path().starts_with(
            "/routing/1/calculateRoute/52.37317,4.89066:52.16109,4.49015/json"
        ));
        assert_eq!(query_values(&request.url, "key"), vec!["abc"]);
        // Unset sectionTypes emits the full fixed list
        assert_eq!(query_values(&request.url, "sectionType").len(), 13);
    }

    #[test]
    fn test_soft_waypoint_becomes_circle_segment() {
        let soft = soft_waypoint(&GeoInput::from([4.7, 52.2]), 500.0).unwrap();
        let locations = vec![
            GeoInput::from([4.89066, 52.37317]),
            GeoInput::from(soft),
            GeoInput::from([4.49015, 52.16109]),
        ];
        let request = build_route_request(&base_params(locations)).unwrap();

        assert!(!request.is_post());
        assert!(
            request
                .url
                .path()
                .contains(":circle(52.2,4.7,500):")
        );
    }

    #[test]
    fn test_path_switches_to_post() {
        let path: Vec<[f64; 2]> = vec![
            [1.0, 2.0],
            [3.0, 4.0],
            [5.0, 6.0],
            [7.0, 8.0],
            [9.0, 10.0],
        ];
        let request = build_route_request(&base_params(vec![GeoInput::from(path)])).unwrap();

        assert!(request.is_post());
        // URL carries the resolved first/last pair
        assert!(request.url.path().contains("/2,1:10,9/"));

        let body = request.body.unwrap();
        assert_eq!(body["supportingPoints"].as_array().map(Vec::len), Some(5));
        assert_eq!(
            body["supportingPoints"][0],
            json!({"latitude": 2.0, "longitude": 1.0})
        );
        // A bare path has no user-significant boundaries
        assert!(body.get("pointWaypoints").is_none());
    }

    #[test]
    fn test_embedded_route_records_waypoints() {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "sections".to_string(),
            json!({"leg": [{"startPointIndex": 0, "endPointIndex": 2}]}),
        );
        let route = Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::LineString(vec![
                vec![1.0, 2.0],
                vec![3.0, 4.0],
                vec![5.0, 6.0],
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };
        let locations = vec![
            GeoInput::from([1.0, 2.0]),
            GeoInput::from(route),
            GeoInput::from([5.0, 6.0]),
        ];
        let request = build_route_request(&base_params(locations)).unwrap();

        assert!(request.is_post());
        let body = request.body.unwrap();
        // Shared boundaries are deduplicated
        assert_eq!(body["supportingPoints"].as_array().map(Vec::len), Some(3));
        assert_eq!(
            body["pointWaypoints"],
            json!([
                {"supportingPointIndex": 0, "waypointSourceType": "USER_DEFINED"},
                {"supportingPointIndex": 2, "waypointSourceType": "USER_DEFINED"},
            ])
        );
    }

    #[test]
    fn test_avoid_uses_repeated_parameters() {
        let mut params = base_params(two_waypoints());
        params.avoid = Some(vec![Avoid::TollRoads, Avoid::Ferries]);
        let request = build_route_request(&params).unwrap();
        assert_eq!(
            query_values(&request.url, "avoid"),
            vec!["tollRoads", "ferries"]
        );
    }

    #[test]
    fn test_explicit_empty_section_types_emit_nothing() {
        let mut params = base_params(two_waypoints());
        params.section_types = Some(vec![]);
        let request = build_route_request(&params).unwrap();
        assert!(query_values(&request.url, "sectionType").is_empty());
    }

    #[test]
    fn test_explicit_subset_of_section_types() {
        let mut params = base_params(two_waypoints());
        params.section_types = Some(vec![SectionType::Traffic, SectionType::Country]);
        let request = build_route_request(&params).unwrap();
        assert_eq!(
            query_values(&request.url, "sectionType"),
            vec!["traffic", "country"]
        );
    }

    #[test]
    fn test_depart_at_selected_by_discriminator() {
        let mut params = base_params(two_waypoints());
        params.when = Some(When::DepartAt(
            DateTime::parse_from_rfc3339("2026-02-11T10:00:00+01:00").unwrap(),
        ));
        let request = build_route_request(&params).unwrap();
        assert_eq!(
            query_values(&request.url, "departAt"),
            vec!["2026-02-11T10:00:00+01:00"]
        );
        assert!(query_values(&request.url, "arriveAt").is_empty());
    }

    #[test]
    fn test_hilliness_only_for_thrilling_routes() {
        let mut params = base_params(two_waypoints());
        params.hilliness = Some(Hilliness::High);
        let request = build_route_request(&params).unwrap();
        assert!(query_values(&request.url, "hilliness").is_empty());

        params.route_type = Some(RouteType::Thrilling);
        let request = build_route_request(&params).unwrap();
        assert_eq!(query_values(&request.url, "hilliness"), vec!["high"]);
    }

    #[test]
    fn test_combustion_consumption_parameters() {
        let mut params = base_params(two_waypoints());
        params.vehicle = Some(VehicleParams {
            weight_kg: Some(1600),
            consumption: Some(ConsumptionModel::Combustion {
                constant_speed_consumption: vec![
                    SpeedConsumption {
                        speed_kmh: 50,
                        consumption: 6.3,
                    },
                    SpeedConsumption {
                        speed_kmh: 130,
                        consumption: 11.5,
                    },
                ],
                current_fuel_liters: Some(43.0),
                auxiliary_power_liters_per_hour: Some(0.2),
                fuel_energy_density_mjoules_per_liter: None,
            }),
            ..Default::default()
        });
        let request = build_route_request(&params).unwrap();

        assert_eq!(
            query_values(&request.url, "constantSpeedConsumptionInLitersPerHundredkm"),
            vec!["50,6.3:130,11.5"]
        );
        assert_eq!(query_values(&request.url, "vehicleWeight"), vec!["1600"]);
        assert_eq!(query_values(&request.url, "currentFuelInLiters"), vec!["43"]);
    }

    #[test]
    fn test_electric_consumption_parameters() {
        let mut params = base_params(two_waypoints());
        params.vehicle = Some(VehicleParams {
            consumption: Some(ConsumptionModel::Electric {
                constant_speed_consumption: vec![SpeedConsumption {
                    speed_kmh: 77,
                    consumption: 16.0,
                }],
                current_charge_kwh: Some(43.0),
                max_charge_kwh: Some(85.0),
                auxiliary_power_kw: Some(1.7),
            }),
            ..Default::default()
        });
        let request = build_route_request(&params).unwrap();

        assert_eq!(
            query_values(&request.url, "constantSpeedConsumptionInkWhPerHundredkm"),
            vec!["77,16"]
        );
        assert_eq!(query_values(&request.url, "maxChargeInkWh"), vec!["85"]);
    }

    #[test]
    fn test_soft_origin_is_rejected() {
        let soft = soft_waypoint(&GeoInput::from([4.9, 52.3]), 100.0).unwrap();
        let params = base_params(vec![GeoInput::from(soft), GeoInput::from([4.5, 52.1])]);
        let error = build_route_request(&params).unwrap_err();
        assert!(matches!(error, ErrorKind::InvalidInput(_)));
    }

    #[test]
    fn test_malformed_coordinates_surface_as_invalid_input() {
        let feature = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        let params = base_params(vec![GeoInput::from(feature), GeoInput::from([1.0, 2.0])]);
        let error = build_route_request(&params).unwrap_err();
        assert!(matches!(error, ErrorKind::InvalidInput(_)));
    }
}
