//! Shared slug helpers.

/// Normalizes a title or raw slug the way the host derives slugs:
/// lowercase ASCII words joined by single hyphens.
pub fn sanitize_title(value: &str) -> String {
    slug::slugify(value.trim())
}

/// Builds the `-N` disambiguation variant of a slug.
pub fn suffixed_slug(base: &str, suffix: u64) -> String {
    format!("{base}-{suffix}")
}

/// Returns true when a desired slug was actually supplied by the host.
pub(crate) fn is_supplied(slug: Option<&str>) -> bool {
    slug.is_some_and(|value| !value.is_empty())
}
