//! Error taxonomy and per-family error normalizers
//!
//! Every failure (bad geo input, parameter violations, upstream HTTP
//! errors, unexpected template failures) funnels through exactly one
//! normalization step per call and reaches the caller as a single
//! [`ServiceError`] tagged with the service name. Raw transport and
//! validation exceptions never cross the service boundary.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::geo::InputShapeError;
use crate::transport::TransportFailure;
use crate::validate::ValidationIssue;

/// The services this SDK exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    /// Forward geocoding
    Geocode,
    /// Reverse geocoding
    ReverseGeocode,
    /// Fuzzy search
    FuzzySearch,
    /// Search within caller-supplied geometries
    GeometrySearch,
    /// Route calculation
    Routing,
    /// Place lookup by entity id
    PlaceById,
    /// EV charging-point availability
    ChargingAvailability,
}

impl ServiceName {
    /// Wire-level name of the service
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Geocode => "geocode",
            Self::ReverseGeocode => "reverseGeocode",
            Self::FuzzySearch => "fuzzySearch",
            Self::GeometrySearch => "geometrySearch",
            Self::Routing => "routing",
            Self::PlaceById => "placeById",
            Self::ChargingAvailability => "chargingAvailability",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of failure a call ran into
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A geo input matched no recognized coordinate representation
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputShapeError),

    /// One or more parameter constraints were violated
    #[error("validation failed with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// The upstream API answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the upstream error payload
        message: String,
    },

    /// The request never produced a response
    #[error("transport failed: {0}")]
    Transport(String),

    /// Anything else, wrapped with its original message
    #[error("{0}")]
    Unexpected(String),
}

/// The single error type callers observe
#[derive(Debug, Error)]
#[error("{service}: {kind}")]
pub struct ServiceError {
    /// The service the failed call belongs to
    pub service: ServiceName,
    /// What went wrong
    pub kind: ErrorKind,
}

impl ServiceError {
    /// HTTP status of an upstream API error, if that is what this is
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The parameter violations of a validation failure, if that is what
    /// this is
    #[must_use]
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match &self.kind {
            ErrorKind::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

/// Signature shared by the per-family error normalizers
pub type ErrorNormalizer = fn(TransportFailure) -> ErrorKind;

/// Default normalizer: upstream message at `message`
#[must_use]
pub fn normalize_default(failure: TransportFailure) -> ErrorKind {
    normalize_at(failure, &["message"])
}

/// Search-family normalizer: upstream message at `errorText`
#[must_use]
pub fn normalize_search(failure: TransportFailure) -> ErrorKind {
    normalize_at(failure, &["errorText"])
}

/// Routing normalizer: upstream message at `error.description`
#[must_use]
pub fn normalize_routing(failure: TransportFailure) -> ErrorKind {
    normalize_at(failure, &["error", "description"])
}

/// Charging normalizer: upstream message at `detailedError.message`
#[must_use]
pub fn normalize_charging(failure: TransportFailure) -> ErrorKind {
    normalize_at(failure, &["detailedError", "message"])
}

fn normalize_at(failure: TransportFailure, path: &[&str]) -> ErrorKind {
    match failure {
        TransportFailure::Status {
            status,
            data,
            message,
        } => {
            let upstream = lookup_str(&data, path).unwrap_or(&message).to_string();
            ErrorKind::Api {
                status,
                message: upstream,
            }
        }
        other => ErrorKind::Transport(other.to_string()),
    }
}

fn lookup_str<'a>(data: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(data, |acc, segment| acc.get(segment))
        .and_then(Value::as_str)
}
