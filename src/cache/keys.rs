//! Cache key derivation
//!
//! Keys are derived only from the logical request, so two requests for the
//! same resource share a key no matter how their parameters were ordered.

/// Key for a provider resource: `tmdb:{path}?{sorted params}`
pub fn resource(path: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let query = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("tmdb:{}", path)
    } else {
        format!("tmdb:{}?{}", path, query)
    }
}

// Keeps user-supplied values (search queries) from forging another key.
fn escape(raw: &str) -> String {
    raw.replace('%', "%25").replace('&', "%26").replace('=', "%3D")
}
