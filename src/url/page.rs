use url::Url;

/// Returns `base` with the page query parameter set or removed
///
/// Other query parameters are kept in their original order; the page parameter
/// is appended last when set. Passing `None` removes the parameter entirely
/// rather than setting it to zero, since many pagers treat a missing parameter
/// and `param=0` differently.
///
/// # Arguments
///
/// * `base` - The listing URL
/// * `param` - Name of the page query parameter
/// * `page` - Page index to set, or None to remove the parameter
///
/// # Examples
///
/// ```
/// use url::Url;
/// use dredge::url::with_page_param;
///
/// let base = Url::parse("https://ex.com/list?sort=name&page=2").unwrap();
/// assert_eq!(with_page_param(&base, "page", None).as_str(), "https://ex.com/list?sort=name");
/// assert_eq!(with_page_param(&base, "page", Some(3)).as_str(), "https://ex.com/list?sort=name&page=3");
/// ```
pub fn with_page_param(base: &Url, param: &str, page: Option<u32>) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);

    if !kept.is_empty() || page.is_some() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &kept {
            query.append_pair(key, value);
        }
        if let Some(page) = page {
            query.append_pair(param, &page.to_string());
        }
    }

    url
}
