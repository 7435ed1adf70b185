//! Routing response parser
//!
//! Rebuilds a continuous route from the upstream payload: the per-leg point
//! arrays become one LineString, the legs become reconstructed `leg`
//! sections (the API never sends those directly), and the flat section
//! array is dispatched by its type tag into the typed per-kind lists.

use atlas_core::{ErrorKind, RawResponse};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::locations::LatLon;
use crate::models::{
    CountrySection, LegSection, MagnitudeOfDelay, Route, RouteProperties, RouteSections,
    RouteSummary, RoutesResponse, SectionRange, SectionType, Tec, TrafficCategory, TrafficSection,
    TravelMode, TravelModeSection,
};
use crate::params::RouteParams;

/// Parse the raw route calculation payload
///
/// Pure: consumes the deserialized payload and allocates the result, nothing
/// else.
///
/// # Errors
///
/// [`ErrorKind::Unexpected`] when the payload does not deserialize; a route
/// without sections is not an error.
pub fn parse_routes_response(
    response: RawResponse,
    _params: &RouteParams,
) -> Result<RoutesResponse, ErrorKind> {
    let raw: RawRoutesResponse = serde_json::from_value(response.body)
        .map_err(|e| ErrorKind::Unexpected(format!("malformed routing payload: {e}")))?;

    Ok(RoutesResponse {
        routes: raw.routes.into_iter().map(convert_route).collect(),
    })
}

fn convert_route(raw: RawRoute) -> Route {
    let mut geometry = Vec::new();
    let mut leg_sections = Vec::with_capacity(raw.legs.len());
    let mut offset = 0;

    for leg in raw.legs {
        let count = leg.points.len();
        leg_sections.push(LegSection {
            range: SectionRange {
                start_point_index: offset,
                end_point_index: offset + count,
            },
            summary: leg.summary,
        });
        offset += count;
        geometry.extend(
            leg.points
                .into_iter()
                .map(|point| [point.longitude, point.latitude]),
        );
    }

    let mut sections = RouteSections {
        leg: leg_sections,
        ..RouteSections::default()
    };
    for section in raw.sections {
        dispatch_section(&mut sections, section);
    }

    Route {
        geometry,
        properties: RouteProperties {
            summary: raw.summary,
            sections,
            guidance: raw.guidance,
        },
    }
}

fn dispatch_section(sections: &mut RouteSections, raw: RawSection) {
    let range = SectionRange {
        start_point_index: raw.start_point_index,
        end_point_index: raw.end_point_index,
    };

    let Some(kind) = SectionType::from_api_tag(&raw.section_type) else {
        warn!(tag = %raw.section_type, "Skipping unrecognized section type");
        return;
    };

    match kind {
        SectionType::Country => {
            sections.country.get_or_insert_with(Vec::new).push(CountrySection {
                range,
                country_code: raw.country_code.unwrap_or_default(),
            });
        }
        SectionType::TravelMode => {
            sections
                .travel_mode
                .get_or_insert_with(Vec::new)
                .push(TravelModeSection {
                    range,
                    travel_mode: raw.travel_mode.unwrap_or(TravelMode::Other),
                });
        }
        SectionType::Traffic => {
            sections.traffic.get_or_insert_with(Vec::new).push(TrafficSection {
                range,
                delay_in_seconds: raw.delay_in_seconds,
                effective_speed_in_kmh: raw.effective_speed_in_kmh,
                simple_category: raw.simple_category,
                magnitude_of_delay: MagnitudeOfDelay::from_code(raw.magnitude_of_delay),
                tec: raw.tec,
            });
        }
        SectionType::CarTrain => push_plain(&mut sections.car_train, range),
        SectionType::Carpool => push_plain(&mut sections.carpool, range),
        SectionType::Ferry => push_plain(&mut sections.ferry, range),
        SectionType::Motorway => push_plain(&mut sections.motorway, range),
        SectionType::Pedestrian => push_plain(&mut sections.pedestrian, range),
        SectionType::TollRoad => push_plain(&mut sections.toll_road, range),
        SectionType::TollVignette => push_plain(&mut sections.toll_vignette, range),
        SectionType::Tunnel => push_plain(&mut sections.tunnel, range),
        SectionType::Urban => push_plain(&mut sections.urban, range),
        SectionType::Unpaved => push_plain(&mut sections.unpaved, range),
    }
}

fn push_plain(bucket: &mut Option<Vec<SectionRange>>, range: SectionRange) {
    bucket.get_or_insert_with(Vec::new).push(range);
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawRoutesResponse {
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoute {
    summary: RouteSummary,
    #[serde(default)]
    legs: Vec<RawLeg>,
    #[serde(default)]
    sections: Vec<RawSection>,
    guidance: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    summary: RouteSummary,
    #[serde(default)]
    points: Vec<LatLon>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    start_point_index: usize,
    end_point_index: usize,
    section_type: String,
    country_code: Option<String>,
    travel_mode: Option<TravelMode>,
    simple_category: Option<TrafficCategory>,
    effective_speed_in_kmh: Option<f64>,
    delay_in_seconds: Option<u64>,
    magnitude_of_delay: Option<i64>,
    tec: Option<Tec>,
}
