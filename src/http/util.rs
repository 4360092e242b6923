// src/http/util.rs

use url::Url;

use crate::error::ClientError;

// Helper to append a path to the base URL. Plain concatenation rather than
// Url::join: a leading slash on `path` must not drop a path segment the base
// carries (the subscription base ends in `/api`).
pub(crate) fn build_url(base: &Url, path: &str) -> Result<Url, ClientError> {
    let spliced = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&spliced).map_err(ClientError::UrlParse)
}
