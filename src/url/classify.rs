use super::NormalizedUrl;
use crate::ClassifyError;

/// Literal path segment that marks a content item
const ITEMS_SEGMENT: &str = "items";

/// Checks if a host belongs to the target platform
///
/// The host matches when it equals the root domain or is any subdomain of it.
///
/// # Examples
///
/// ```
/// use weblink_tree::url::is_target_host;
///
/// assert!(is_target_host("qiita.com", "qiita.com"));
/// assert!(is_target_host("blog.qiita.com", "qiita.com"));
/// assert!(!is_target_host("notqiita.com", "qiita.com"));
/// ```
pub fn is_target_host(host: &str, root_domain: &str) -> bool {
    host == root_domain
        || host
            .strip_suffix(root_domain)
            .is_some_and(|rest| rest.ends_with('.'))
}

/// Extracts the content-item identifier from a platform URL
///
/// Item URLs have the shape `/{user}/items/{item_id}`. Trailing slashes are
/// ignored before the path is split on `/`.
///
/// # Returns
///
/// * `Ok(String)` - The item identifier
/// * `Err(ClassifyError::NotTargetHost)` - The host is outside the platform
/// * `Err(ClassifyError::NotItemPath)` - The path is not an item path
pub fn extract_item_id(url: &NormalizedUrl, root_domain: &str) -> Result<String, ClassifyError> {
    if !is_target_host(url.host(), root_domain) {
        return Err(ClassifyError::NotTargetHost(url.host().to_string()));
    }

    let segments: Vec<&str> = url.path().trim_end_matches('/').split('/').collect();
    match segments.as_slice() {
        ["", _user, ITEMS_SEGMENT, item_id] => Ok((*item_id).to_string()),
        _ => Err(ClassifyError::NotItemPath(url.path().to_string())),
    }
}
