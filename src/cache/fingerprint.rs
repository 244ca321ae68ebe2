//! Request fingerprints used as cache keys
//!
//! A fingerprint captures everything that makes two requests interchangeable:
//! the method, the resolved URL, the body and the header set. Header names are
//! case-insensitive in HTTP, so they are lowercased and the whole set is sorted
//! before it becomes part of the key.

use reqwest::header::HeaderMap;

/// Cache key identifying a logically unique request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFingerprint {
    method: String,
    url: String,
    body: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestFingerprint {
    /// Derives a fingerprint from the four request fields
    ///
    /// # Arguments
    /// * `method` - HTTP method, compared case-insensitively
    /// * `url` - Fully resolved request URL
    /// * `body` - Request body, if any
    /// * `headers` - Header name/value pairs in any order
    pub fn new<I, K, V>(method: &str, url: &str, body: Option<&str>, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers: Vec<(String, String)> = headers
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.as_ref().to_string()))
            .collect();
        headers.sort();

        Self {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
            body: body.map(str::to_string),
            headers,
        }
    }

    /// Derives a fingerprint from a reqwest header map
    pub fn from_header_map(
        method: &str,
        url: &str,
        body: Option<&str>,
        headers: &HeaderMap,
    ) -> Self {
        let pairs = headers.iter().map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        });
        Self::new(method, url, body, pairs)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Normalized header set, sorted by name then value
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const URL: &str = "https://x.test/v1/teams/57";

    fn base() -> RequestFingerprint {
        RequestFingerprint::new(
            "GET",
            URL,
            None,
            [("X-Auth-Token", "secret"), ("X-Response-Control", "minified")],
        )
    }

    #[test]
    fn test_identical_requests_produce_equal_fingerprints() {
        assert_eq!(base(), base());
    }

    #[test]
    fn test_header_order_does_not_matter() {
        let reordered = RequestFingerprint::new(
            "GET",
            URL,
            None,
            [("X-Response-Control", "minified"), ("X-Auth-Token", "secret")],
        );
        assert_eq!(base(), reordered);
    }

    #[test]
    fn test_header_name_case_does_not_matter() {
        let lowered = RequestFingerprint::new(
            "get",
            URL,
            None,
            [("x-auth-token", "secret"), ("x-response-control", "minified")],
        );
        assert_eq!(base(), lowered);
    }

    #[test]
    fn test_changing_method_changes_fingerprint() {
        let other = RequestFingerprint::new(
            "POST",
            URL,
            None,
            [("X-Auth-Token", "secret"), ("X-Response-Control", "minified")],
        );
        assert_ne!(base(), other);
    }

    #[test]
    fn test_changing_url_changes_fingerprint() {
        let other = RequestFingerprint::new(
            "GET",
            "https://x.test/v1/teams/58",
            None,
            [("X-Auth-Token", "secret"), ("X-Response-Control", "minified")],
        );
        assert_ne!(base(), other);
    }

    #[test]
    fn test_changing_body_changes_fingerprint() {
        let other = RequestFingerprint::new(
            "GET",
            URL,
            Some("{}"),
            [("X-Auth-Token", "secret"), ("X-Response-Control", "minified")],
        );
        assert_ne!(base(), other);
    }

    #[test]
    fn test_changing_headers_changes_fingerprint() {
        let other_value = RequestFingerprint::new(
            "GET",
            URL,
            None,
            [("X-Auth-Token", "other"), ("X-Response-Control", "minified")],
        );
        let missing_header =
            RequestFingerprint::new("GET", URL, None, [("X-Response-Control", "minified")]);

        assert_ne!(base(), other_value);
        assert_ne!(base(), missing_header);
    }

    #[test]
    fn test_from_header_map_matches_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert("x-response-control", HeaderValue::from_static("minified"));
        headers.insert("x-auth-token", HeaderValue::from_static("secret"));

        let fingerprint = RequestFingerprint::from_header_map("GET", URL, None, &headers);

        assert_eq!(fingerprint, base());
        assert_eq!(fingerprint.headers()[0].0, "x-auth-token");
        assert_eq!(fingerprint.method(), "GET");
        assert_eq!(fingerprint.url(), URL);
        assert!(fingerprint.body().is_none());
    }
}
