//! Place lookup and EV charging availability for the Atlas geospatial SDK
//!
//! Two small services built on the search endpoint family: fetching one
//! place's full detail by entity id, and the live availability of an EV
//! charging park.
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_core::{GlobalConfig, HttpTransport};
//! use atlas_places::{ChargingAvailabilityParams, charging_availability};
//!
//! let config = GlobalConfig {
//!     api_key: Some("…".to_string()),
//!     common_base_url: Some("https://api.example.com".to_string()),
//!     ..Default::default()
//! };
//! let transport = HttpTransport::new(&config)?;
//!
//! let availability = charging_availability(
//!     &transport,
//!     &config,
//!     ChargingAvailabilityParams::new("0acf2345-…"),
//! )
//! .await?;
//! ```

mod charging;
mod place;

use atlas_core::{
    GlobalConfig, ServiceError, ServiceName, ServiceTemplate, Transport, execute,
    normalize_charging, normalize_search,
};
use tracing::instrument;

pub use charging::{
    CHARGING_AVAILABILITY_SCHEMA, ChargingAvailability, ChargingAvailabilityParams,
    ChargingConnector, ConnectorCounts, PowerLevelCounts, build_charging_availability_request,
    parse_charging_availability_response,
};
pub use place::{
    PLACE_BY_ID_SCHEMA, PlaceByIdParams, PlaceResponse, build_place_by_id_request,
    parse_place_by_id_response,
};

/// The default place lookup template
#[must_use]
pub fn place_by_id_template() -> ServiceTemplate<PlaceByIdParams, PlaceResponse> {
    ServiceTemplate::new(
        ServiceName::PlaceById,
        &PLACE_BY_ID_SCHEMA,
        build_place_by_id_request,
        parse_place_by_id_response,
        normalize_search,
    )
}

/// The default charging availability template
#[must_use]
pub fn charging_availability_template()
-> ServiceTemplate<ChargingAvailabilityParams, ChargingAvailability> {
    ServiceTemplate::new(
        ServiceName::ChargingAvailability,
        &CHARGING_AVAILABILITY_SCHEMA,
        build_charging_availability_request,
        parse_charging_availability_response,
        normalize_charging,
    )
}

/// Look up one place by its entity id
///
/// # Errors
///
/// One normalized [`ServiceError`] tagged [`ServiceName::PlaceById`].
#[instrument(skip_all, fields(entity_id = %params.entity_id))]
pub async fn place_by_id(
    transport: &dyn Transport,
    config: &GlobalConfig,
    params: PlaceByIdParams,
) -> Result<PlaceResponse, ServiceError> {
    execute(transport, config, &place_by_id_template(), params).await
}

/// Fetch the live availability of a charging park
///
/// # Errors
///
/// One normalized [`ServiceError`] tagged
/// [`ServiceName::ChargingAvailability`].
#[instrument(skip_all, fields(id = %params.charging_availability))]
pub async fn charging_availability(
    transport: &dyn Transport,
    config: &GlobalConfig,
    params: ChargingAvailabilityParams,
) -> Result<ChargingAvailability, ServiceError> {
    execute(transport, config, &charging_availability_template(), params).await
}
