//! Route location classification and linearization
//!
//! A route request's `locations` list mixes plain waypoints, soft (circular)
//! waypoints, bare coordinate paths to reconstruct, and previously
//! calculated routes to embed. [`RouteLocation`] settles what each entry is;
//! [`linearize`] flattens them into the supporting-point sequence the POST
//! body needs, deduplicating shared boundary points and recording which
//! indices are genuine user waypoints.

use atlas_core::{GeoInput, GeoInputKind, InputShapeError, LonLat, point_feature, radius_meters};
use geojson::{Feature, Geometry, Value as GeoValue};
use serde::{Deserialize, Serialize};

/// Wire-level coordinate used in POST bodies and leg points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LatLon {
    /// Convert from a `[lon, lat]` pair
    #[must_use]
    pub const fn from_lon_lat(pair: LonLat) -> Self {
        Self {
            latitude: pair[1],
            longitude: pair[0],
        }
    }
}

/// One classified entry of a route request's `locations` list
#[derive(Debug, Clone, PartialEq)]
pub enum RouteLocation {
    /// A single waypoint, exact or soft, as a canonical Point feature
    Point(Feature),
    /// A bare ordered coordinate list whose route shape should be
    /// reconstructed
    PathToReconstruct(Vec<LonLat>),
    /// A previously calculated route whose geometry is embedded as-is;
    /// recognized by its `properties.sections.leg` metadata
    RouteToEmbed(Feature),
}

impl RouteLocation {
    /// Classify a geo input as one of the three entry kinds
    ///
    /// # Errors
    ///
    /// Fails with [`InputShapeError`] when the input is neither
    /// waypoint-shaped nor a usable polyline.
    pub fn classify(input: &GeoInput) -> Result<Self, InputShapeError> {
        match input {
            GeoInput::Path(pairs) => Ok(Self::PathToReconstruct(pairs.clone())),
            GeoInput::Feature(feature) if input.classify() == GeoInputKind::Path => {
                if has_leg_sections(feature) {
                    Ok(Self::RouteToEmbed(feature.clone()))
                } else {
                    Ok(Self::PathToReconstruct(line_string_pairs(feature)?))
                }
            }
            waypoint => Ok(Self::Point(to_point_feature(waypoint)?)),
        }
    }

    /// The `radiusMeters` of a soft point waypoint
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match self {
            Self::Point(feature) => radius_meters(feature),
            _ => None,
        }
    }

    /// The ordered `[lon, lat]` points this entry contributes
    pub(crate) fn points(&self) -> Result<Vec<LonLat>, InputShapeError> {
        match self {
            Self::Point(feature) => {
                Ok(vec![GeoInput::Feature(feature.clone()).coordinate_pair()?])
            }
            Self::PathToReconstruct(pairs) => Ok(pairs.clone()),
            Self::RouteToEmbed(feature) => line_string_pairs(feature),
        }
    }
}

/// The flattened wire form of a locations list
#[derive(Debug, Clone, PartialEq)]
pub struct Linearized {
    /// Deduplicated points of all entries, in order
    pub supporting_points: Vec<LatLon>,
    /// Indices into `supporting_points` of the user-specified waypoints
    pub point_waypoints: Vec<usize>,
}

/// Flatten classified locations into supporting points and waypoint indices
///
/// Entries are walked in order; a point waypoint contributes one point, a
/// path or embedded route all of its points. When the previous segment's
/// last point exactly equals the next segment's first point the duplicate is
/// not re-emitted: the user-visible boundary is one shared index. Only
/// point-waypoint entries are recorded in `point_waypoints`; path and
/// embedded-route interior points never are.
///
/// # Errors
///
/// Fails with [`InputShapeError`] when an entry carries malformed
/// coordinates.
pub fn linearize(locations: &[RouteLocation]) -> Result<Linearized, InputShapeError> {
    let mut supporting_points: Vec<LatLon> = Vec::new();
    let mut point_waypoints = Vec::new();

    for location in locations {
        let points = location.points()?;
        let mut first_index = supporting_points.len();
        let mut points = points.into_iter();

        if let (Some(last), Some(first)) = (supporting_points.last(), points.as_slice().first()) {
            let next = LatLon::from_lon_lat(*first);
            // Exact equality: re-embedded routes carry bit-identical
            // boundary coordinates
            if last.latitude == next.latitude && last.longitude == next.longitude {
                points.next();
                first_index = supporting_points.len() - 1;
            }
        }

        supporting_points.extend(points.map(LatLon::from_lon_lat));

        if matches!(location, RouteLocation::Point(_)) {
            point_waypoints.push(first_index);
        }
    }

    Ok(Linearized {
        supporting_points,
        point_waypoints,
    })
}

fn to_point_feature(input: &GeoInput) -> Result<Feature, InputShapeError> {
    match input {
        GeoInput::Feature(feature) => {
            GeoInput::Feature(feature.clone()).coordinate_pair()?;
            Ok(feature.clone())
        }
        other => Ok(point_feature(other.coordinate_pair()?)),
    }
}

fn has_leg_sections(feature: &Feature) -> bool {
    feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("sections"))
        .and_then(|sections| sections.get("leg"))
        .is_some()
}

fn line_string_pairs(feature: &Feature) -> Result<Vec<LonLat>, InputShapeError> {
    let Some(Geometry {
        value: GeoValue::LineString(positions),
        ..
    }) = &feature.geometry
    else {
        return Err(InputShapeError(
            "expected a LineString feature".to_string(),
        ));
    };

    positions
        .iter()
        .map(|position| {
            if position.len() >= 2 {
                Ok([position[0], position[1]])
            } else {
                Err(InputShapeError(format!(
                    "coordinate with {} component(s)",
                    position.len()
                )))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use atlas_core::soft_waypoint;
    use serde_json::json;

    use super::*;

    fn embedded_route(points: &[LonLat]) -> Feature {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "sections".to_string(),
            json!({"leg": [{"startPointIndex": 0, "endPointIndex": points.len() - 1}]}),
        );
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::LineString(
                points.iter().map(|pair| vec![pair[0], pair[1]]).collect(),
            ))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    fn line_feature(points: &[LonLat]) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::LineString(
                points.iter().map(|pair| vec![pair[0], pair[1]]).collect(),
            ))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    #[test]
    fn test_classify_pair_as_point() {
        let location = RouteLocation::classify(&GeoInput::from([4.9, 52.3])).unwrap();
        assert!(matches!(location, RouteLocation::Point(_)));
        assert_eq!(location.radius(), None);
    }

    #[test]
    fn test_classify_soft_waypoint_keeps_radius() {
        let feature = soft_waypoint(&GeoInput::from([4.9, 52.3]), 250.0).unwrap();
        let location = RouteLocation::classify(&GeoInput::from(feature)).unwrap();
        assert_eq!(location.radius(), Some(250.0));
    }

    #[test]
    fn test_classify_pair_list_as_path() {
        let input = GeoInput::from(vec![[1.0, 2.0], [3.0, 4.0]]);
        let location = RouteLocation::classify(&input).unwrap();
        assert_eq!(
            location,
            RouteLocation::PathToReconstruct(vec![[1.0, 2.0], [3.0, 4.0]])
        );
    }

    #[test]
    fn test_classify_line_feature_without_legs_as_path() {
        let input = GeoInput::from(line_feature(&[[1.0, 2.0], [3.0, 4.0]]));
        let location = RouteLocation::classify(&input).unwrap();
        assert!(matches!(location, RouteLocation::PathToReconstruct(_)));
    }

    #[test]
    fn test_classify_leg_carrying_feature_as_route() {
        let input = GeoInput::from(embedded_route(&[[1.0, 2.0], [3.0, 4.0]]));
        let location = RouteLocation::classify(&input).unwrap();
        assert!(matches!(location, RouteLocation::RouteToEmbed(_)));
    }

    #[test]
    fn test_linearize_single_path_has_no_waypoints() {
        let path = RouteLocation::PathToReconstruct(vec![
            [1.0, 2.0],
            [3.0, 4.0],
            [5.0, 6.0],
            [7.0, 8.0],
            [9.0, 10.0],
        ]);
        let linearized = linearize(&[path]).unwrap();
        assert_eq!(linearized.supporting_points.len(), 5);
        assert!(linearized.point_waypoints.is_empty());
        assert_eq!(
            linearized.supporting_points[0],
            LatLon {
                latitude: 2.0,
                longitude: 1.0
            }
        );
    }

    #[test]
    fn test_linearize_points_only() {
        let locations = vec![
            RouteLocation::classify(&GeoInput::from([4.9, 52.3])).unwrap(),
            RouteLocation::classify(&GeoInput::from([4.5, 52.1])).unwrap(),
        ];
        let linearized = linearize(&locations).unwrap();
        assert_eq!(linearized.supporting_points.len(), 2);
        assert_eq!(linearized.point_waypoints, vec![0, 1]);
    }

    #[test]
    fn test_linearize_dedupes_shared_boundary() {
        // Waypoint, then an embedded route starting at the same coordinate
        let locations = vec![
            RouteLocation::classify(&GeoInput::from([1.0, 2.0])).unwrap(),
            RouteLocation::classify(&GeoInput::from(embedded_route(&[
                [1.0, 2.0],
                [3.0, 4.0],
                [5.0, 6.0],
            ])))
            .unwrap(),
            RouteLocation::classify(&GeoInput::from([5.0, 6.0])).unwrap(),
        ];
        let linearized = linearize(&locations).unwrap();

        // 1 + 3 + 1 points, minus two deduplicated boundaries
        assert_eq!(linearized.supporting_points.len(), 3);
        // Both genuine waypoints resolve to shared indices
        assert_eq!(linearized.point_waypoints, vec![0, 2]);
    }

    #[test]
    fn test_linearize_keeps_distinct_boundaries() {
        let locations = vec![
            RouteLocation::classify(&GeoInput::from([0.0, 0.0])).unwrap(),
            RouteLocation::PathToReconstruct(vec![[1.0, 2.0], [3.0, 4.0]]),
        ];
        let linearized = linearize(&locations).unwrap();
        assert_eq!(linearized.supporting_points.len(), 3);
        assert_eq!(linearized.point_waypoints, vec![0]);
    }

    #[test]
    fn test_linearize_waypoint_indices_are_monotonic() {
        let locations = vec![
            RouteLocation::classify(&GeoInput::from([0.0, 0.0])).unwrap(),
            RouteLocation::PathToReconstruct(vec![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]),
            RouteLocation::classify(&GeoInput::from([4.0, 4.0])).unwrap(),
        ];
        let linearized = linearize(&locations).unwrap();
        assert_eq!(linearized.point_waypoints, vec![0, 4]);
        assert!(
            linearized
                .point_waypoints
                .windows(2)
                .all(|pair| pair[0] <= pair[1])
        );
    }

    #[test]
    fn test_linearize_rejects_malformed_coordinates() {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::LineString(vec![
                vec![1.0, 2.0],
                vec![3.0],
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        let location = RouteLocation::classify(&GeoInput::from(feature));
        assert!(location.is_err());
    }
}
