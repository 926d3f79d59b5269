use crate::UrlError;
use serde::Serialize;
use std::fmt;
use url::Url;

/// A URL reduced to scheme, host and path
///
/// Values of this type only come out of [`normalize_url`], so the query,
/// fragment, userinfo and port are always absent. Normalizing the string form
/// of a `NormalizedUrl` again yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// The lowercase host of the URL
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// The path of the URL, always starting with `/`
    pub fn path(&self) -> &str {
        self.0.path()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<NormalizedUrl> for String {
    fn from(url: NormalizedUrl) -> Self {
        url.0.into()
    }
}

/// Normalizes a URL string to `scheme://host/path`
///
/// # Normalization Steps
///
/// 1. Parse the URL as an absolute URL; reject if malformed
/// 2. Reject any scheme other than http and https
/// 3. Drop userinfo and port
/// 4. Drop the query string and the fragment
///
/// The host is lowercased and dot segments are resolved by the parser itself.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - Normalized URL
/// * `Err(UrlError::Malformed)` - The string is not an absolute URL
/// * `Err(UrlError::NotHttpUrl)` - The URL is not HTTP(S)
///
/// # Examples
///
/// ```
/// use weblink_tree::url::normalize_url;
///
/// let url = normalize_url("https://qiita.com/alice/items/abc123?ref=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://qiita.com/alice/items/abc123");
///
/// assert!(normalize_url("mailto:alice@example.com").is_err());
/// ```
pub fn normalize_url(url_str: &str) -> Result<NormalizedUrl, UrlError> {
    let malformed = |reason: String| UrlError::Malformed {
        url: url_str.to_string(),
        reason,
    };

    let mut url = Url::parse(url_str.trim()).map_err(|e| malformed(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::NotHttpUrl(url_str.to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(malformed("missing host".to_string()));
    }

    url.set_username("")
        .and_then(|_| url.set_password(None))
        .and_then(|_| url.set_port(None))
        .map_err(|_| malformed("cannot strip userinfo or port".to_string()))?;

    url.set_query(None);
    url.set_fragment(None);

    Ok(NormalizedUrl(url))
}
