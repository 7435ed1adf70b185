//! Route calculation service for the Atlas geospatial SDK
//!
//! Calculates routes between two or more locations. Locations may be plain
//! coordinates, soft (circular) waypoints, bare coordinate paths whose road
//! shape should be reconstructed, or previously calculated routes to embed.
//! The response is a set of [`Route`] values, each convertible to a GeoJSON
//! LineString feature carrying the summary and the typed section lists.
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_core::{GeoInput, GlobalConfig, HttpTransport};
//! use atlas_routing::{RouteParams, calculate_route};
//!
//! let config = GlobalConfig {
//!     api_key: Some("…".to_string()),
//!     common_base_url: Some("https://api.example.com".to_string()),
//!     ..Default::default()
//! };
//! let transport = HttpTransport::new(&config)?;
//!
//! let params = RouteParams::new(vec![
//!     GeoInput::from([4.89066, 52.37317]), // Amsterdam
//!     GeoInput::from([4.49015, 52.16109]), // Leiden
//! ]);
//! let routes = calculate_route(&transport, &config, params).await?;
//! ```

mod locations;
mod models;
mod params;
mod request;
mod response;

use atlas_core::{
    GlobalConfig, ServiceError, ServiceName, ServiceTemplate, Transport, execute,
    normalize_routing,
};
use tracing::instrument;

pub use locations::{LatLon, Linearized, RouteLocation, linearize};
pub use models::{
    CountrySection, LegSection, MagnitudeOfDelay, Route, RouteProperties, RouteSections,
    RouteSummary, RoutesResponse, SectionRange, SectionType, Tec, TecCause, TrafficCategory,
    TrafficSection, TravelMode, TravelModeSection,
};
pub use params::{
    AdrCategory, Avoid, ComputeTravelTimeFor, ConsumptionModel, Hilliness, InstructionsType,
    ROUTE_SCHEMA, RouteParams, RouteRepresentation, RouteType, SpeedConsumption, VehicleLoadType,
    VehicleParams, When, Windingness,
};
pub use request::build_route_request;
pub use response::parse_routes_response;

/// The default route calculation template
#[must_use]
pub fn template() -> ServiceTemplate<RouteParams, RoutesResponse> {
    ServiceTemplate::new(
        ServiceName::Routing,
        &ROUTE_SCHEMA,
        build_route_request,
        parse_routes_response,
        normalize_routing,
    )
}

/// Calculate routes between the locations in `params`
///
/// # Errors
///
/// One normalized [`ServiceError`] tagged [`ServiceName::Routing`],
/// whichever step failed.
#[instrument(skip_all, fields(locations = params.locations.len()))]
pub async fn calculate_route(
    transport: &dyn Transport,
    config: &GlobalConfig,
    params: RouteParams,
) -> Result<RoutesResponse, ServiceError> {
    execute(transport, config, &template(), params).await
}
