//! Geographic input normalization
//!
//! Callers hand the SDK locations in several shapes: a bare `[lon, lat]`
//! pair, an ordered list of pairs, a GeoJSON geometry, or a full GeoJSON
//! feature. [`GeoInput`] disambiguates those shapes once at the SDK boundary
//! so downstream code pattern-matches on a closed type instead of
//! re-inspecting JSON on every use.

use geojson::{Feature, Geometry, Value as GeoValue};
use serde::ser::{Serialize, Serializer};
use thiserror::Error;

/// A `[longitude, latitude]` pair
pub type LonLat = [f64; 2];

/// Error for a location input that matches no recognized coordinate shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized geo input: {0}")]
pub struct InputShapeError(pub String);

/// A location or path input, disambiguated at the SDK boundary
#[derive(Debug, Clone, PartialEq)]
pub enum GeoInput {
    /// A bare `[lon, lat]` coordinate pair
    Coordinates(LonLat),
    /// An ordered polyline of `[lon, lat]` pairs
    Path(Vec<LonLat>),
    /// A GeoJSON feature (Point or LineString)
    Feature(Feature),
}

/// Structural classification of a [`GeoInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoInputKind {
    /// A single location
    Waypoint,
    /// An ordered polyline
    Path,
}

impl GeoInput {
    /// Classify as a single waypoint or a path
    ///
    /// Purely structural: a pair list or a LineString feature is a path,
    /// everything else a waypoint. Coordinate ranges are the validator's
    /// concern, not checked here.
    #[must_use]
    pub fn classify(&self) -> GeoInputKind {
        match self {
            Self::Path(_) => GeoInputKind::Path,
            Self::Feature(feature) if is_line_string(feature) => GeoInputKind::Path,
            Self::Coordinates(_) | Self::Feature(_) => GeoInputKind::Waypoint,
        }
    }

    /// Extract the single `[lon, lat]` pair of a waypoint-shaped input
    ///
    /// Accepts a bare pair or a Point feature.
    ///
    /// # Errors
    ///
    /// Fails with [`InputShapeError`] for paths, non-Point features, and
    /// features without a geometry.
    pub fn coordinate_pair(&self) -> Result<LonLat, InputShapeError> {
        match self {
            Self::Coordinates(pair) => Ok(*pair),
            Self::Feature(feature) => feature_coordinate_pair(feature),
            Self::Path(_) => Err(InputShapeError(
                "a path has no single coordinate pair".to_string(),
            )),
        }
    }
}

impl From<LonLat> for GeoInput {
    fn from(pair: LonLat) -> Self {
        Self::Coordinates(pair)
    }
}

impl From<Vec<LonLat>> for GeoInput {
    fn from(pairs: Vec<LonLat>) -> Self {
        Self::Path(pairs)
    }
}

impl From<Feature> for GeoInput {
    fn from(feature: Feature) -> Self {
        Self::Feature(feature)
    }
}

impl From<Geometry> for GeoInput {
    fn from(geometry: Geometry) -> Self {
        Self::Feature(Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(serde_json::Map::new()),
            foreign_members: None,
        })
    }
}

// Serialized as its structural JSON shape (pair, pair list, or feature
// object) so declarative schemas can address parameter fields uniformly.
impl Serialize for GeoInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Coordinates(pair) => pair.serialize(serializer),
            Self::Path(pairs) => pairs.serialize(serializer),
            Self::Feature(feature) => feature.serialize(serializer),
        }
    }
}

/// Wrap a coordinate pair as a canonical empty-properties Point feature
#[must_use]
pub fn point_feature(pair: LonLat) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::Point(vec![pair[0], pair[1]]))),
        id: None,
        properties: Some(serde_json::Map::new()),
        foreign_members: None,
    }
}

/// Normalize an input to a Point feature carrying a `radiusMeters` property
///
/// A feature input is reused as the base so pre-existing properties (address
/// metadata and the like), `bbox` and id survive unchanged; the radius always
/// overrides a previously set `radiusMeters`. Other inputs are wrapped via
/// [`point_feature`] first.
///
/// # Errors
///
/// Fails with [`InputShapeError`] when the input is not waypoint-shaped.
pub fn soft_waypoint(input: &GeoInput, radius_meters: f64) -> Result<Feature, InputShapeError> {
    let mut base = match input {
        GeoInput::Feature(feature) => {
            feature_coordinate_pair(feature)?;
            feature.clone()
        }
        other => point_feature(other.coordinate_pair()?),
    };

    let mut properties = base.properties.take().unwrap_or_default();
    properties.insert("radiusMeters".to_string(), radius_meters.into());
    base.properties = Some(properties);
    Ok(base)
}

/// The `radiusMeters` property of a feature, if set to a number
#[must_use]
pub fn radius_meters(feature: &Feature) -> Option<f64> {
    feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("radiusMeters"))
        .and_then(serde_json::Value::as_f64)
}

fn feature_coordinate_pair(feature: &Feature) -> Result<LonLat, InputShapeError> {
    match &feature.geometry {
        Some(Geometry {
            value: GeoValue::Point(position),
            ..
        }) if position.len() >= 2 => Ok([position[0], position[1]]),
        Some(geometry) => Err(InputShapeError(format!(
            "expected a Point feature, found {} geometry",
            geometry.value.type_name()
        ))),
        None => Err(InputShapeError("feature has no geometry".to_string())),
    }
}

fn is_line_string(feature: &Feature) -> bool {
    matches!(
        &feature.geometry,
        Some(Geometry {
            value: GeoValue::LineString(_),
            ..
        })
    )
}
