//! Shared URL assembly for the search endpoint family

use atlas_core::{CommonParams, ErrorKind};
use url::Url;

/// Assemble `{base}{path}` and append the common query parameters
pub(crate) fn service_url(common: &CommonParams, path: &str) -> Result<Url, ErrorKind> {
    let base = common
        .resolved_base_url()
        .ok_or_else(|| ErrorKind::Unexpected("no base URL resolved".to_string()))?;

    let mut url = Url::parse(&format!("{base}{path}"))
        .map_err(|e| ErrorKind::Unexpected(e.to_string()))?;
    common.append_query(&mut url);
    Ok(url)
}

/// Comma-join a list value for a single query parameter
pub(crate) fn csv<T: AsRef<str>>(values: &[T]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}
