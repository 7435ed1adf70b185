//! Route calculation parameters
//!
//! [`RouteParams`] carries the locations list plus the routing and vehicle
//! options; the closed vocabularies are enums with wire-level query values.
//! [`ROUTE_SCHEMA`] is the declarative constraint set the executor applies
//! before the request builder runs.

use atlas_core::{
    CommonParams, FieldRule, GeoInput, GlobalConfig, JsonKind, MergeGlobalDefaults, Rule, Schema,
};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::models::{SectionType, TravelMode};

/// Parameters of one route calculation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    /// Common per-call parameters (key, base URLs, language)
    #[serde(flatten)]
    pub common: CommonParams,

    /// Ordered locations: origin, optional stops, destination
    pub locations: Vec<GeoInput>,

    /// Road categories to avoid; each value becomes one `avoid` parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid: Option<Vec<Avoid>>,

    /// Consider live traffic when planning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic: Option<bool>,

    /// Initial vehicle heading in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u16>,

    /// Departure or arrival anchor of the calculation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<When>,

    /// Kind of guidance instructions to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions_type: Option<InstructionsType>,

    /// Number of alternative routes besides the best one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_alternatives: Option<u8>,

    /// How much route geometry to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_representation: Option<RouteRepresentation>,

    /// Optimization goal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_type: Option<RouteType>,

    /// Section kinds to report: unset means the full fixed list, an empty
    /// list means none, a non-empty list exactly those
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_types: Option<Vec<SectionType>>,

    /// Additional travel times to compute; unset leaves the upstream default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_travel_time_for: Option<ComputeTravelTimeFor>,

    /// Travel mode of the route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<TravelMode>,

    /// Hill preference, only meaningful for thrilling routes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hilliness: Option<Hilliness>,

    /// Curve preference, only meaningful for thrilling routes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windingness: Option<Windingness>,

    /// Vehicle dimensions, load and consumption model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleParams>,
}

impl RouteParams {
    /// Parameters for a route along `locations` with all options unset
    #[must_use]
    pub fn new(locations: Vec<GeoInput>) -> Self {
        Self {
            common: CommonParams::default(),
            locations,
            avoid: None,
            traffic: None,
            heading: None,
            when: None,
            instructions_type: None,
            max_alternatives: None,
            route_representation: None,
            route_type: None,
            section_types: None,
            compute_travel_time_for: None,
            travel_mode: None,
            hilliness: None,
            windingness: None,
            vehicle: None,
        }
    }
}

impl MergeGlobalDefaults for RouteParams {
    fn merge_defaults(&mut self, config: &GlobalConfig) {
        self.common.merge(config);
    }
}

/// Departure/arrival anchor, discriminated by its `option` tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "option", content = "value", rename_all = "camelCase")]
pub enum When {
    /// Depart at the given instant
    DepartAt(DateTime<FixedOffset>),
    /// Arrive by the given instant
    ArriveBy(DateTime<FixedOffset>),
}

/// Road categories a route can avoid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Avoid {
    /// Toll roads
    TollRoads,
    /// Motorways
    Motorways,
    /// Ferries
    Ferries,
    /// Unpaved roads
    UnpavedRoads,
    /// Carpool lanes
    Carpools,
    /// Roads already used earlier in the route
    AlreadyUsedRoads,
}

impl Avoid {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TollRoads => "tollRoads",
            Self::Motorways => "motorways",
            Self::Ferries => "ferries",
            Self::UnpavedRoads => "unpavedRoads",
            Self::Carpools => "carpools",
            Self::AlreadyUsedRoads => "alreadyUsedRoads",
        }
    }
}

/// Kinds of guidance instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InstructionsType {
    /// Machine-readable codes
    Coded,
    /// Human-readable text
    Text,
    /// Text with phrase tags
    Tagged,
}

impl InstructionsType {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coded => "coded",
            Self::Text => "text",
            Self::Tagged => "tagged",
        }
    }
}

/// How much route geometry to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteRepresentation {
    /// Full polyline
    Polyline,
    /// Summary only, no geometry
    SummaryOnly,
    /// No route data at all
    #[serde(rename = "none")]
    NoGeometry,
}

impl RouteRepresentation {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polyline => "polyline",
            Self::SummaryOnly => "summaryOnly",
            Self::NoGeometry => "none",
        }
    }
}

/// Optimization goal of the calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteType {
    /// Minimize travel time
    Fastest,
    /// Minimize distance
    Shortest,
    /// Minimize fuel/energy
    Eco,
    /// Prefer interesting roads
    Thrilling,
}

impl RouteType {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Shortest => "shortest",
            Self::Eco => "eco",
            Self::Thrilling => "thrilling",
        }
    }
}

/// Which additional travel times to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComputeTravelTimeFor {
    /// All traffic variants
    All,
    /// None besides the main travel time
    #[serde(rename = "none")]
    NoAdditional,
}

impl ComputeTravelTimeFor {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NoAdditional => "none",
        }
    }
}

/// Hill preference for thrilling routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Hilliness {
    /// Few hills
    Low,
    /// Default
    Normal,
    /// Many hills
    High,
}

impl Hilliness {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Curve preference for thrilling routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Windingness {
    /// Few curves
    Low,
    /// Default
    Normal,
    /// Many curves
    High,
}

impl Windingness {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Cargo classifications restricting routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VehicleLoadType {
    /// Explosives (US class 1)
    UsHazmatClass1,
    /// Compressed gas (US class 2)
    UsHazmatClass2,
    /// Flammable liquids (US class 3)
    UsHazmatClass3,
    /// Flammable solids (US class 4)
    UsHazmatClass4,
    /// Oxidizers (US class 5)
    UsHazmatClass5,
    /// Poisons (US class 6)
    UsHazmatClass6,
    /// Radioactive (US class 7)
    UsHazmatClass7,
    /// Corrosives (US class 8)
    UsHazmatClass8,
    /// Miscellaneous (US class 9)
    UsHazmatClass9,
    /// General explosive goods
    OtherHazmatExplosive,
    /// General hazards
    OtherHazmatGeneral,
    /// Goods harmful to water
    OtherHazmatHarmfulToWater,
}

impl VehicleLoadType {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UsHazmatClass1 => "USHazmatClass1",
            Self::UsHazmatClass2 => "USHazmatClass2",
            Self::UsHazmatClass3 => "USHazmatClass3",
            Self::UsHazmatClass4 => "USHazmatClass4",
            Self::UsHazmatClass5 => "USHazmatClass5",
            Self::UsHazmatClass6 => "USHazmatClass6",
            Self::UsHazmatClass7 => "USHazmatClass7",
            Self::UsHazmatClass8 => "USHazmatClass8",
            Self::UsHazmatClass9 => "USHazmatClass9",
            Self::OtherHazmatExplosive => "otherHazmatExplosive",
            Self::OtherHazmatGeneral => "otherHazmatGeneral",
            Self::OtherHazmatHarmfulToWater => "otherHazmatHarmfulToWater",
        }
    }
}

/// ADR tunnel restriction codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdrCategory {
    /// Category B
    B,
    /// Category C
    C,
    /// Category D
    D,
    /// Category E
    E,
}

impl AdrCategory {
    /// Wire-level query value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

/// Vehicle dimensions, load and consumption model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleParams {
    /// Maximum speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed_kmh: Option<u16>,
    /// Total weight in kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<u32>,
    /// Weight per axle in kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axle_weight_kg: Option<u32>,
    /// Length in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_meters: Option<f64>,
    /// Width in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_meters: Option<f64>,
    /// Height in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_meters: Option<f64>,
    /// Cargo classifications; each value becomes one `vehicleLoadType`
    /// parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_type: Option<Vec<VehicleLoadType>>,
    /// ADR tunnel restriction code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adr_tunnel_restriction_code: Option<AdrCategory>,
    /// Commercial vehicle flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial: Option<bool>,
    /// Consumption model, keyed by engine type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption: Option<ConsumptionModel>,
    /// Efficiency of converting chemical energy to kinetic energy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_efficiency: Option<f64>,
    /// Efficiency of recovering kinetic energy while braking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceleration_efficiency: Option<f64>,
    /// Efficiency of converting chemical energy to potential energy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uphill_efficiency: Option<f64>,
    /// Efficiency of recovering potential energy while descending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downhill_efficiency: Option<f64>,
}

/// A `speed,consumption` support point of a consumption curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedConsumption {
    /// Speed in km/h
    pub speed_kmh: u16,
    /// Consumption at that speed (liters or kWh per 100 km, depending on
    /// the engine type)
    pub consumption: f64,
}

/// Consumption model, with unit-specific parameters per engine type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "engineType", rename_all = "camelCase")]
pub enum ConsumptionModel {
    /// Combustion engine, consumption in liters per 100 km
    #[serde(rename_all = "camelCase")]
    Combustion {
        /// Speed-to-consumption support points
        constant_speed_consumption: Vec<SpeedConsumption>,
        /// Current fuel in liters
        #[serde(skip_serializing_if = "Option::is_none")]
        current_fuel_liters: Option<f64>,
        /// Auxiliary power draw in liters per hour
        #[serde(skip_serializing_if = "Option::is_none")]
        auxiliary_power_liters_per_hour: Option<f64>,
        /// Energy density of the fuel in megajoules per liter
        #[serde(skip_serializing_if = "Option::is_none")]
        fuel_energy_density_mjoules_per_liter: Option<f64>,
    },
    /// Electric engine, consumption in kWh per 100 km
    #[serde(rename_all = "camelCase")]
    Electric {
        /// Speed-to-consumption support points
        constant_speed_consumption: Vec<SpeedConsumption>,
        /// Current charge in kWh
        #[serde(skip_serializing_if = "Option::is_none")]
        current_charge_kwh: Option<f64>,
        /// Maximum chargeable energy in kWh
        #[serde(skip_serializing_if = "Option::is_none")]
        max_charge_kwh: Option<f64>,
        /// Auxiliary power draw in kW
        #[serde(skip_serializing_if = "Option::is_none")]
        auxiliary_power_kw: Option<f64>,
    },
}

/// Declarative constraints for route calculation parameters
pub static ROUTE_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            path: "locations",
            rule: Rule::Required,
        },
        FieldRule {
            path: "locations",
            rule: Rule::TypeOf(JsonKind::Array),
        },
        FieldRule {
            path: "locations",
            rule: Rule::MinItems(2),
        },
        FieldRule {
            path: "traffic",
            rule: Rule::TypeOf(JsonKind::Bool),
        },
        FieldRule {
            path: "heading",
            rule: Rule::Range {
                min: 0.0,
                max: 360.0,
            },
        },
        FieldRule {
            path: "maxAlternatives",
            rule: Rule::Range { min: 0.0, max: 5.0 },
        },
        FieldRule {
            path: "instructionsType",
            rule: Rule::OneOf(&["coded", "text", "tagged"]),
        },
        FieldRule {
            path: "routeRepresentation",
            rule: Rule::OneOf(&["polyline", "summaryOnly", "none"]),
        },
        FieldRule {
            path: "routeType",
            rule: Rule::OneOf(&["fastest", "shortest", "eco", "thrilling"]),
        },
        FieldRule {
            path: "sectionTypes",
            rule: Rule::ArrayOf(JsonKind::String),
        },
        FieldRule {
            path: "computeTravelTimeFor",
            rule: Rule::OneOf(&["all", "none"]),
        },
        FieldRule {
            path: "travelMode",
            rule: Rule::OneOf(&[
                "car",
                "truck",
                "taxi",
                "bus",
                "van",
                "motorcycle",
                "bicycle",
                "pedestrian",
            ]),
        },
        FieldRule {
            path: "hilliness",
            rule: Rule::OneOf(&["low", "normal", "high"]),
        },
        FieldRule {
            path: "windingness",
            rule: Rule::OneOf(&["low", "normal", "high"]),
        },
        FieldRule {
            path: "when.option",
            rule: Rule::OneOf(&["departAt", "arriveBy"]),
        },
        FieldRule {
            path: "vehicle",
            rule: Rule::ObjectShape(&[
                FieldRule {
                    path: "maxSpeedKmh",
                    rule: Rule::Range {
                        min: 0.0,
                        max: 250.0,
                    },
                },
                FieldRule {
                    path: "weightKg",
                    rule: Rule::TypeOf(JsonKind::Number),
                },
                FieldRule {
                    path: "axleWeightKg",
                    rule: Rule::TypeOf(JsonKind::Number),
                },
                FieldRule {
                    path: "lengthMeters",
                    rule: Rule::TypeOf(JsonKind::Number),
                },
                FieldRule {
                    path: "widthMeters",
                    rule: Rule::TypeOf(JsonKind::Number),
                },
                FieldRule {
                    path: "heightMeters",
                    rule: Rule::TypeOf(JsonKind::Number),
                },
                FieldRule {
                    path: "loadType",
                    rule: Rule::ArrayOf(JsonKind::String),
                },
                FieldRule {
                    path: "adrTunnelRestrictionCode",
                    rule: Rule::OneOf(&["B", "C", "D", "E"]),
                },
                FieldRule {
                    path: "commercial",
                    rule: Rule::TypeOf(JsonKind::Bool),
                },
            ]),
        },
    ],
};
