use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be skipped:
/// - empty or whitespace-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - fragment-only links (same page anchors)
/// - hrefs that do not resolve, or resolve to a non-HTTP(S) URL
///
/// The fragment of the resolved URL is always dropped so that anchors into the
/// same page deduplicate to one URL.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use dredge::url::resolve_href;
///
/// let base = Url::parse("https://ex.com/list?page=2").unwrap();
/// let url = resolve_href("/item/7#map", &base).unwrap();
/// assert_eq!(url.as_str(), "https://ex.com/item/7");
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

/// Removes the query string from a URL
pub fn strip_query(url: &mut Url) {
    url.set_query(None);
}
