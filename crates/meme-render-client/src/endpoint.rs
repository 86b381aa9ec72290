//! Service URLs built segment by segment, so user-supplied ids never change the path shape.

use anyhow::{Context, Result};
use reqwest::Url;

/// Parses a service base URL; it must be able to carry path segments.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).with_context(|| format!("Invalid service URL: {}", base_url))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Service URL cannot carry a path: {}", base_url);
    }
    Ok(url)
}

/// Appends `segments` to `base`, percent-encoding each one (`/`, `?`, `#` and `%` included).
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
