//! Default filename derivation for downloads.
//!
//! Prefers a `filename=` from the Content-Disposition header, falls back to
//! the last URL path segment, and sanitizes the result for Linux filesystems.

/// Default filename when URL path and Content-Disposition yield nothing usable.
const DEFAULT_FILENAME: &str = "artifact.bin";

/// Derives a safe local filename for saving a download.
pub fn derive_filename(url: &str, content_disposition: Option<&str>) -> String {
    let candidate = content_disposition
        .and_then(content_disposition_filename)
        .filter(|s| !s.is_empty())
        .or_else(|| filename_from_url_path(url));

    let raw = match candidate {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Extracts the last path segment from a URL for use as a filename hint.
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Pulls a `filename=` value out of a Content-Disposition header, quoted or bare.
fn content_disposition_filename(value: &str) -> Option<String> {
    for part in value.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("filename=") {
            let name = rest.trim().trim_matches('"').trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// Strips path separators, NUL and control characters; trims leading and
/// trailing dots and spaces so the name cannot escape the target directory.
fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0' && !c.is_control())
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == ' ')
        .to_string()
}
