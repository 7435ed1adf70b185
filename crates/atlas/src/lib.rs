//! Typed Rust SDK for geospatial web services
//!
//! One [`Atlas`] client wires every service (geocoding, fuzzy and geometry
//! search, reverse geocoding, route calculation, place lookup and EV
//! charging availability) to a shared HTTP transport and a single
//! [`GlobalConfig`]. Calls are independent: parameters are validated, the
//! wire request built, sent once, and the response parsed into GeoJSON-based
//! domain shapes; every failure surfaces as one normalized
//! [`ServiceError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas::{Atlas, GeoInput, GlobalConfig, RouteParams};
//!
//! let atlas = Atlas::new(GlobalConfig {
//!     api_key: Some("…".to_string()),
//!     common_base_url: Some("https://api.example.com".to_string()),
//!     ..Default::default()
//! })?;
//!
//! let routes = atlas
//!     .calculate_route(RouteParams::new(vec![
//!         GeoInput::from([4.89066, 52.37317]),
//!         GeoInput::from([4.49015, 52.16109]),
//!     ]))
//!     .await?;
//! ```
//!
//! Per-call customization goes through the `*_with` variants, which accept a
//! [`ServiceTemplate`] with any subset of its steps replaced.

pub use atlas_core::{
    CommonParams, ErrorKind, GeoInput, GeoInputKind, GlobalConfig, HttpTransport, InputShapeError,
    LonLat, MergeGlobalDefaults, RawResponse, ServiceError, ServiceName, ServiceTemplate,
    Transport, TransportFailure, ValidationIssue, WireRequest, execute, point_feature,
    soft_waypoint,
};
pub use atlas_places::{
    ChargingAvailability, ChargingAvailabilityParams, ChargingConnector, ConnectorCounts,
    PlaceByIdParams, PlaceResponse, PowerLevelCounts,
};
pub use atlas_routing::{
    MagnitudeOfDelay, Route, RouteParams, RouteProperties, RouteSections, RouteSummary,
    RoutesResponse, SectionRange, SectionType, TrafficSection, TravelMode, VehicleParams, When,
};
pub use atlas_search::{
    FuzzySearchParams, GeocodeParams, GeometrySearchParams, ReverseGeocodeParams, SearchGeometry,
    SearchResponse, SearchSummary,
};

/// The SDK entry point: one client for all services
#[derive(Debug)]
pub struct Atlas {
    config: GlobalConfig,
    transport: HttpTransport,
}

impl Atlas {
    /// Create a client from the global configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: GlobalConfig) -> Result<Self, TransportFailure> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Calculate routes between two or more locations
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn calculate_route(
        &self,
        params: RouteParams,
    ) -> Result<RoutesResponse, ServiceError> {
        atlas_routing::calculate_route(&self.transport, &self.config, params).await
    }

    /// Geocode an address
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn geocode(&self, params: GeocodeParams) -> Result<SearchResponse, ServiceError> {
        atlas_search::geocode(&self.transport, &self.config, params).await
    }

    /// Reverse geocode a coordinate
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn reverse_geocode(
        &self,
        params: ReverseGeocodeParams,
    ) -> Result<SearchResponse, ServiceError> {
        atlas_search::reverse_geocode(&self.transport, &self.config, params).await
    }

    /// Fuzzy search for addresses, POIs and geographies
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn fuzzy_search(
        &self,
        params: FuzzySearchParams,
    ) -> Result<SearchResponse, ServiceError> {
        atlas_search::fuzzy_search(&self.transport, &self.config, params).await
    }

    /// Search inside caller-supplied geometries
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn geometry_search(
        &self,
        params: GeometrySearchParams,
    ) -> Result<SearchResponse, ServiceError> {
        atlas_search::geometry_search(&self.transport, &self.config, params).await
    }

    /// Look up one place by entity id
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn place_by_id(
        &self,
        params: PlaceByIdParams,
    ) -> Result<PlaceResponse, ServiceError> {
        atlas_places::place_by_id(&self.transport, &self.config, params).await
    }

    /// Fetch the live availability of a charging park
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn charging_availability(
        &self,
        params: ChargingAvailabilityParams,
    ) -> Result<ChargingAvailability, ServiceError> {
        atlas_places::charging_availability(&self.transport, &self.config, params).await
    }

    /// Run any service call with a caller-customized template
    ///
    /// # Errors
    ///
    /// One normalized [`ServiceError`].
    pub async fn execute_with<P, R>(
        &self,
        template: &ServiceTemplate<P, R>,
        params: P,
    ) -> Result<R, ServiceError>
    where
        P: MergeGlobalDefaults,
    {
        execute(&self.transport, &self.config, template, params).await
    }
}
