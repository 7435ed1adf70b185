//! Routing domain models
//!
//! Typed representations of calculated routes: the concatenated geometry, a
//! summary with parsed instants, and the per-kind section lists
//! reconstructed from the flat upstream section array.

use chrono::{DateTime, FixedOffset};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one route calculation
#[derive(Debug, Clone, PartialEq)]
pub struct RoutesResponse {
    /// Calculated routes, best first
    pub routes: Vec<Route>,
}

impl RoutesResponse {
    /// Convert all routes into a GeoJSON feature collection
    #[must_use]
    pub fn into_feature_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.routes.into_iter().map(Route::into_feature).collect(),
            foreign_members: None,
        }
    }
}

/// One calculated route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// `[lon, lat]` coordinates of the full route, all legs concatenated
    pub geometry: Vec<[f64; 2]>,
    /// Summary, sections and optional guidance
    pub properties: RouteProperties,
}

impl Route {
    /// Convert into a GeoJSON LineString feature
    #[must_use]
    pub fn into_feature(self) -> Feature {
        let coordinates = self
            .geometry
            .into_iter()
            .map(|pair| vec![pair[0], pair[1]])
            .collect();
        let properties = match serde_json::to_value(&self.properties) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        };
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::LineString(coordinates))),
            id: None,
            properties,
            foreign_members: None,
        }
    }
}

/// Properties of a calculated route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProperties {
    /// Whole-route summary
    pub summary: RouteSummary,
    /// Typed sections of the route geometry
    pub sections: RouteSections,
    /// Turn-by-turn guidance as returned upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<Value>,
}

/// Summary of a route or a single leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// Route length in meters
    pub length_in_meters: u64,
    /// Travel time in seconds, traffic included when requested
    pub travel_time_in_seconds: u64,
    /// Delay caused by traffic in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_delay_in_seconds: Option<u64>,
    /// Length of the route affected by traffic in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_length_in_meters: Option<u64>,
    /// Departure instant
    pub departure_time: DateTime<FixedOffset>,
    /// Arrival instant
    pub arrival_time: DateTime<FixedOffset>,
    /// Travel time disregarding traffic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_traffic_travel_time_in_seconds: Option<u64>,
    /// Travel time using historic traffic only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historic_traffic_travel_time_in_seconds: Option<u64>,
    /// Travel time using live traffic only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_traffic_incidents_travel_time_in_seconds: Option<u64>,
    /// Estimated fuel use of a combustion consumption model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_consumption_in_liters: Option<f64>,
    /// Estimated charge use of an electric consumption model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_consumption_in_kwh: Option<f64>,
}

/// An index range into the route geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRange {
    /// First point of the section
    pub start_point_index: usize,
    /// Last point of the section (inclusive range end as reported upstream)
    pub end_point_index: usize,
}

/// A leg of the route, reconstructed from per-leg point counts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegSection {
    /// Index range of this leg
    #[serde(flatten)]
    pub range: SectionRange,
    /// Per-leg summary with parsed instants
    pub summary: RouteSummary,
}

/// A section tagged with the country it crosses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySection {
    /// Index range of this section
    #[serde(flatten)]
    pub range: SectionRange,
    /// ISO 3166-1 alpha-3 country code
    pub country_code: String,
}

/// A section tagged with its travel mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelModeSection {
    /// Index range of this section
    #[serde(flatten)]
    pub range: SectionRange,
    /// Mode the section is traversable with
    pub travel_mode: TravelMode,
}

/// A section affected by a traffic event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSection {
    /// Index range of this section
    #[serde(flatten)]
    pub range: SectionRange,
    /// Delay caused by the event in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_in_seconds: Option<u64>,
    /// Effective speed through the event in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_speed_in_kmh: Option<f64>,
    /// Simplified severity category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_category: Option<TrafficCategory>,
    /// Normalized magnitude of the delay
    pub magnitude_of_delay: MagnitudeOfDelay,
    /// Raw traffic event code details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tec: Option<Tec>,
}

/// Simplified traffic event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficCategory {
    /// Congestion
    Jam,
    /// Road works
    RoadWork,
    /// Full closure
    RoadClosure,
    /// Anything else
    #[serde(other)]
    Other,
}

/// Normalized magnitude of a traffic delay
///
/// Every numeric code the upstream API can send maps to one of these; an
/// unrecognized or missing code is [`MagnitudeOfDelay::Undefined`], never an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MagnitudeOfDelay {
    /// Code 0: delay of unknown magnitude
    Unknown,
    /// Code 1
    Minor,
    /// Code 2
    Moderate,
    /// Code 3
    Major,
    /// Absent or unrecognized code
    Undefined,
}

impl MagnitudeOfDelay {
    /// Map the upstream numeric code
    #[must_use]
    pub const fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Unknown,
            Some(1) => Self::Minor,
            Some(2) => Self::Moderate,
            Some(3) => Self::Major,
            _ => Self::Undefined,
        }
    }
}

/// Traffic event code details as reported upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tec {
    /// Effect code of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect_code: Option<i64>,
    /// Cause codes of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causes: Option<Vec<TecCause>>,
}

/// One cause entry of a traffic event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TecCause {
    /// Main cause code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_cause_code: Option<i64>,
    /// Sub cause code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_cause_code: Option<i64>,
}

/// Travel modes a route or section can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TravelMode {
    /// Passenger car
    Car,
    /// Truck
    Truck,
    /// Taxi
    Taxi,
    /// Bus
    Bus,
    /// Van
    Van,
    /// Motorcycle
    Motorcycle,
    /// Bicycle
    Bicycle,
    /// On foot
    Pedestrian,
    /// Section not traversable with the requested mode
    #[serde(other)]
    Other,
}

impl TravelMode {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Truck => "truck",
            Self::Taxi => "taxi",
            Self::Bus => "bus",
            Self::Van => "van",
            Self::Motorcycle => "motorcycle",
            Self::Bicycle => "bicycle",
            Self::Pedestrian => "pedestrian",
            Self::Other => "other",
        }
    }
}

/// The section kinds a route can be partitioned into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    /// Car-transporting train
    CarTrain,
    /// Carpool lanes
    Carpool,
    /// Country crossings
    Country,
    /// Ferries
    Ferry,
    /// Motorways
    Motorway,
    /// Pedestrian-only stretches
    Pedestrian,
    /// Toll roads
    TollRoad,
    /// Vignette-required roads
    TollVignette,
    /// Traffic events
    Traffic,
    /// Travel-mode changes
    TravelMode,
    /// Tunnels
    Tunnel,
    /// Urban areas
    Urban,
    /// Unpaved roads
    Unpaved,
}

impl SectionType {
    /// The full fixed set, in wire order
    pub const ALL: [Self; 13] = [
        Self::CarTrain,
        Self::Carpool,
        Self::Country,
        Self::Ferry,
        Self::Motorway,
        Self::Pedestrian,
        Self::TollRoad,
        Self::TollVignette,
        Self::Traffic,
        Self::TravelMode,
        Self::Tunnel,
        Self::Urban,
        Self::Unpaved,
    ];

    /// Value used in the `sectionType` query parameter
    #[must_use]
    pub const fn query_value(self) -> &'static str {
        match self {
            Self::CarTrain => "carTrain",
            Self::Carpool => "carpool",
            Self::Country => "country",
            Self::Ferry => "ferry",
            Self::Motorway => "motorway",
            Self::Pedestrian => "pedestrian",
            Self::TollRoad => "tollRoad",
            Self::TollVignette => "tollVignette",
            Self::Traffic => "traffic",
            Self::TravelMode => "travelMode",
            Self::Tunnel => "tunnel",
            Self::Urban => "urban",
            Self::Unpaved => "unpaved",
        }
    }

    /// Map the tag the response API uses for this kind
    #[must_use]
    pub fn from_api_tag(tag: &str) -> Option<Self> {
        match tag {
            "CAR_TRAIN" => Some(Self::CarTrain),
            "CARPOOL" => Some(Self::Carpool),
            "COUNTRY" => Some(Self::Country),
            "FERRY" => Some(Self::Ferry),
            "MOTORWAY" => Some(Self::Motorway),
            "PEDESTRIAN" => Some(Self::Pedestrian),
            "TOLL_ROAD" => Some(Self::TollRoad),
            "TOLL_VIGNETTE" => Some(Self::TollVignette),
            "TRAFFIC" => Some(Self::Traffic),
            "TRAVEL_MODE" => Some(Self::TravelMode),
            "TUNNEL" => Some(Self::Tunnel),
            "URBAN" => Some(Self::Urban),
            "UNPAVED" => Some(Self::Unpaved),
            _ => None,
        }
    }
}

/// The typed section lists of one route
///
/// `leg` is always present (reconstructed, never supplied upstream); every
/// other list exists only when the API returned at least one section of
/// that kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSections {
    /// Reconstructed legs
    pub leg: Vec<LegSection>,
    /// Car-train sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_train: Option<Vec<SectionRange>>,
    /// Carpool sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carpool: Option<Vec<SectionRange>>,
    /// Country sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Vec<CountrySection>>,
    /// Ferry sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ferry: Option<Vec<SectionRange>>,
    /// Motorway sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorway: Option<Vec<SectionRange>>,
    /// Pedestrian sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pedestrian: Option<Vec<SectionRange>>,
    /// Toll-road sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toll_road: Option<Vec<SectionRange>>,
    /// Toll-vignette sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toll_vignette: Option<Vec<SectionRange>>,
    /// Traffic sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic: Option<Vec<TrafficSection>>,
    /// Travel-mode sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<Vec<TravelModeSection>>,
    /// Tunnel sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<Vec<SectionRange>>,
    /// Urban sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urban: Option<Vec<SectionRange>>,
    /// Unpaved sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpaved: Option<Vec<SectionRange>>,
}
