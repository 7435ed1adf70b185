//! Shared kernel for the Atlas geospatial SDK
//!
//! Everything the per-service crates have in common lives here: the global
//! configuration and its merge semantics, the geo-input normalizer, the
//! declarative parameter validator, the wire request/response types with the
//! reqwest transport, the error taxonomy with its per-family normalizers,
//! and the service template executor.
//!
//! # Architecture
//!
//! A service is a [`ServiceTemplate`]: validate, build-request,
//! parse-response and parse-error steps bundled behind one strategy object.
//! [`execute`] runs the per-call state machine
//! (merge config → validate → build → send → parse) with exactly one error
//! normalization pass, so callers only ever observe [`ServiceError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_core::{GlobalConfig, HttpTransport, execute};
//!
//! let config = GlobalConfig {
//!     api_key: Some("…".to_string()),
//!     common_base_url: Some("https://api.example.com".to_string()),
//!     ..Default::default()
//! };
//! let transport = HttpTransport::new(&config)?;
//! let routes = execute(&transport, &config, &atlas_routing::template(), params).await?;
//! ```

mod config;
mod encoding;
mod error;
mod geo;
mod template;
mod transport;
mod validate;

pub use config::{CommonParams, GlobalConfig, MergeGlobalDefaults};
pub use encoding::encode_path_segment;
pub use error::{
    ErrorKind, ErrorNormalizer, ServiceError, ServiceName, normalize_charging, normalize_default,
    normalize_routing, normalize_search,
};
pub use geo::{
    GeoInput, GeoInputKind, InputShapeError, LonLat, point_feature, radius_meters, soft_waypoint,
};
pub use template::{ServiceTemplate, execute};
pub use transport::{HttpTransport, RawResponse, Transport, TransportFailure, WireRequest};
pub use validate::{
    BASE_URL_ISSUE_MESSAGE, FieldRule, IssueCode, JsonKind, Rule, Schema, ValidationIssue, validate,
};
