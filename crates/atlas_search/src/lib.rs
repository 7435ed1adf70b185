//! Geocoding and search services for the Atlas geospatial SDK
//!
//! Four services share this crate: fuzzy search, forward geocoding, reverse
//! geocoding, and geometry search. Their responses are GeoJSON Point
//! feature collections assembled from the upstream result lists.
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_core::{GlobalConfig, HttpTransport};
//! use atlas_search::{GeocodeParams, geocode};
//!
//! let config = GlobalConfig {
//!     api_key: Some("…".to_string()),
//!     common_base_url: Some("https://api.example.com".to_string()),
//!     ..Default::default()
//! };
//! let transport = HttpTransport::new(&config)?;
//!
//! let results = geocode(
//!     &transport,
//!     &config,
//!     GeocodeParams::new("De Ruijterkade 154, Amsterdam"),
//! )
//! .await?;
//! ```

mod endpoint;
mod fuzzy;
mod geocode;
mod geometry;
mod models;
mod reverse_geocode;

use atlas_core::{
    GlobalConfig, ServiceError, ServiceName, ServiceTemplate, Transport, execute, normalize_search,
};
use tracing::instrument;

pub use fuzzy::{
    FUZZY_SEARCH_SCHEMA, FuzzySearchParams, build_fuzzy_search_request,
    parse_fuzzy_search_response,
};
pub use geocode::{GEOCODE_SCHEMA, GeocodeParams, build_geocode_request, parse_geocode_response};
pub use geometry::{
    GEOMETRY_SEARCH_SCHEMA, GeometrySearchParams, SearchGeometry, build_geometry_search_request,
    parse_geometry_search_response,
};
pub use models::{SearchResponse, SearchSummary, parse_search_body};
pub use reverse_geocode::{
    REVERSE_GEOCODE_SCHEMA, ReverseGeocodeParams, build_reverse_geocode_request,
    parse_reverse_geocode_response,
};

/// The default fuzzy search template
#[must_use]
pub fn fuzzy_search_template() -> ServiceTemplate<FuzzySearchParams, SearchResponse> {
    ServiceTemplate::new(
        ServiceName::FuzzySearch,
        &FUZZY_SEARCH_SCHEMA,
        build_fuzzy_search_request,
        parse_fuzzy_search_response,
        normalize_search,
    )
}

/// The default geocoding template
#[must_use]
pub fn geocode_template() -> ServiceTemplate<GeocodeParams, SearchResponse> {
    ServiceTemplate::new(
        ServiceName::Geocode,
        &GEOCODE_SCHEMA,
        build_geocode_request,
        parse_geocode_response,
        normalize_search,
    )
}

/// The default reverse geocoding template
#[must_use]
pub fn reverse_geocode_template() -> ServiceTemplate<ReverseGeocodeParams, SearchResponse> {
    ServiceTemplate::new(
        ServiceName::ReverseGeocode,
        &REVERSE_GEOCODE_SCHEMA,
        build_reverse_geocode_request,
        parse_reverse_geocode_response,
        normalize_search,
    )
}

/// The default geometry search template
#[must_use]
pub fn geometry_search_template() -> ServiceTemplate<GeometrySearchParams, SearchResponse> {
    ServiceTemplate::new(
        ServiceName::GeometrySearch,
        &GEOMETRY_SEARCH_SCHEMA,
        build_geometry_search_request,
        parse_geometry_search_response,
        normalize_search,
    )
}

/// Fuzzy search for `params.query`
///
/// # Errors
///
/// One normalized [`ServiceError`] tagged [`ServiceName::FuzzySearch`].
#[instrument(skip_all, fields(query = %params.query))]
pub async fn fuzzy_search(
    transport: &dyn Transport,
    config: &GlobalConfig,
    params: FuzzySearchParams,
) -> Result<SearchResponse, ServiceError> {
    execute(transport, config, &fuzzy_search_template(), params).await
}

/// Geocode the address in `params.query`
///
/// # Errors
///
/// One normalized [`ServiceError`] tagged [`ServiceName::Geocode`].
#[instrument(skip_all, fields(query = %params.query))]
pub async fn geocode(
    transport: &dyn Transport,
    config: &GlobalConfig,
    params: GeocodeParams,
) -> Result<SearchResponse, ServiceError> {
    execute(transport, config, &geocode_template(), params).await
}

/// Reverse geocode `params.position`
///
/// # Errors
///
/// One normalized [`ServiceError`] tagged [`ServiceName::ReverseGeocode`].
#[instrument(skip_all)]
pub async fn reverse_geocode(
    transport: &dyn Transport,
    config: &GlobalConfig,
    params: ReverseGeocodeParams,
) -> Result<SearchResponse, ServiceError> {
    execute(transport, config, &reverse_geocode_template(), params).await
}

/// Search `params.query` inside the supplied geometries
///
/// # Errors
///
/// One normalized [`ServiceError`] tagged [`ServiceName::GeometrySearch`].
#[instrument(skip_all, fields(query = %params.query))]
pub async fn geometry_search(
    transport: &dyn Transport,
    config: &GlobalConfig,
    params: GeometrySearchParams,
) -> Result<SearchResponse, ServiceError> {
    execute(transport, config, &geometry_search_template(), params).await
}
