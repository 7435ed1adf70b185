//! Percent-encoding for URL path segments
//!
//! Search queries are embedded in the request path (`/search/2/search/
//! {query}.json`), so they need stricter encoding than query parameters.

/// Percent-encode a string for use in a URL path segment
///
/// Encodes all characters except unreserved characters (`A-Z`, `a-z`,
/// `0-9`, `-`, `_`, `.`, `~`). Spaces are encoded as `%20`.
#[must_use]
pub fn encode_path_segment(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for c in input.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            _ => {
                let mut buffer = [0u8; 4];
                for b in c.encode_utf8(&mut buffer).as_bytes() {
                    result.push_str(&format!("%{b:02X}"));
                }
            }
        }
    }
    result
}
