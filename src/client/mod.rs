//! football-data.org API client
//!
//! This module provides `FootballDataClient`, which resolves resource URLs,
//! attaches the auth headers and returns decoded JSON bodies. Every request
//! goes through the client's `RequestCache` first, so repeated identical
//! calls within the cache's age window do not reach the upstream.

mod season;

pub use season::SeasonClient;

use std::time::Instant;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{debug, trace};

use crate::cache::{CachedResponse, RequestCache, RequestFingerprint};
use crate::config::ClientConfig;
use crate::error::{FootballDataError, Result};

/// Header carrying the API token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Header asking the upstream for minified responses
pub const RESPONSE_CONTROL_HEADER: &str = "x-response-control";

/// Client for the football-data.org REST API
#[derive(Debug)]
pub struct FootballDataClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Headers sent with every request
    headers: HeaderMap,
    /// `{base_url}/{api_version}/`, the root all resource paths are joined to
    api_root: Url,
    /// Responses keyed by request fingerprint
    cache: RequestCache,
}

impl FootballDataClient {
    /// Creates a new client from the given configuration
    ///
    /// # Returns
    /// * `Ok(FootballDataClient)` - a ready client with an empty cache
    /// * `Err(FootballDataError::Config)` - if the base URL does not parse or the
    ///   token cannot be sent as a header value
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| FootballDataError::Config(format!("Cannot build HTTP client: {}", e)))?;

        Self::with_client(http_client, config)
    }

    /// Creates a new client with a custom HTTP client
    ///
    /// The `timeout` option of `config` is ignored; configure it on `http_client`.
    pub fn with_client(http_client: Client, config: ClientConfig) -> Result<Self> {
        let api_root = api_root(&config.base_url, &config.api_version)?;
        let headers = default_headers(config.auth_token.as_deref())?;

        Ok(Self {
            http_client,
            headers,
            api_root,
            cache: RequestCache::new(config.cache_max_len, config.cache_max_age),
        })
    }

    /// Returns a client bound to a single season
    pub fn season(&self, season_id: u64) -> SeasonClient<'_> {
        SeasonClient::new(self, season_id)
    }

    /// The response cache used by this client
    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Joins a resource path onto `{base_url}/{api_version}/`
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        self.api_root
            .join(path.trim_start_matches('/'))
            .map_err(|e| {
                FootballDataError::Config(format!("Invalid resource path '{}': {}", path, e))
            })
    }

    fn fixtures_url(&self, season_id: u64, matchday: Option<u32>) -> Result<Url> {
        let mut url = self.resolve_url(&format!("soccerseasons/{}/fixtures", season_id))?;
        if let Some(matchday) = matchday {
            url.query_pairs_mut()
                .append_pair("matchday", &matchday.to_string());
        }
        Ok(url)
    }

    /// Performs a request, answering from the cache when possible
    ///
    /// `extra_headers` are merged over the client's headers, replacing any of
    /// the same name; the merged set is both sent and part of the cache key.
    /// On a cache miss the full response is read and stored in the cache
    /// whatever its status, so an identical call within the age window gets
    /// the same answer without reaching the upstream.
    pub async fn perform_request(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<CachedResponse> {
        let mut headers = self.headers.clone();
        if let Some(extra) = extra_headers {
            for (name, value) in extra.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }

        let fingerprint = RequestFingerprint::from_header_map(
            method.as_str(),
            url.as_str(),
            body.as_deref(),
            &headers,
        );

        if let Some(cached) = self.cache.get(&fingerprint) {
            trace!(method = %method, url = %url, "Cache hit");
            return Ok(cached);
        }

        debug!(
            method = %method,
            url = %url,
            headers = ?headers.keys().collect::<Vec<_>>(),
            body_len = body.as_ref().map_or(0, String::len),
            "Request"
        );

        let mut request = self
            .http_client
            .request(method.clone(), url)
            .headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let started = Instant::now();
        let response = request.send().await?;

        let status = response.status();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let text = response.text().await?;

        debug!(
            method = %method,
            url = %final_url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            content_length = text.len(),
            "Response"
        );

        let response = CachedResponse {
            status,
            url: final_url,
            headers,
            body: text,
            fetched_at: Utc::now(),
        };
        self.cache.set(fingerprint, response.clone());

        Ok(response)
    }

    /// GETs a URL and decodes its JSON body
    async fn get_json(&self, url: Url) -> Result<Value> {
        let response = self.perform_request(Method::GET, url, None, None).await?;
        decode_json(response)
    }

    /// Lists all available seasons
    pub async fn get_seasons(&self) -> Result<Value> {
        self.get_json(self.resolve_url("soccerseasons/")?).await
    }

    pub async fn get_season(&self, season_id: u64) -> Result<Value> {
        self.get_json(self.resolve_url(&format!("soccerseasons/{}", season_id))?)
            .await
    }

    pub async fn get_teams(&self, season_id: u64) -> Result<Value> {
        self.get_json(self.resolve_url(&format!("soccerseasons/{}/teams", season_id))?)
            .await
    }

    pub async fn get_league_table(&self, season_id: u64) -> Result<Value> {
        self.get_json(self.resolve_url(&format!("soccerseasons/{}/leagueTable", season_id))?)
            .await
    }

    /// Fetches the league table and extracts one standings group
    ///
    /// # Returns
    /// * `Ok(Value)` - the `standings[group]` entry of the league table
    /// * `Err(FootballDataError::GroupNotFound)` - if the table has no such group
    pub async fn get_group(&self, season_id: u64, group: &str) -> Result<Value> {
        let table = self.get_league_table(season_id).await?;
        extract_group(table, group)
    }

    /// Lists fixtures of a season, optionally filtered to one matchday
    pub async fn get_fixtures(&self, season_id: u64, matchday: Option<u32>) -> Result<Value> {
        self.get_json(self.fixtures_url(season_id, matchday)?).await
    }

    pub async fn get_fixture(&self, season_id: u64, fixture_id: u64) -> Result<Value> {
        self.get_json(self.resolve_url(&format!(
            "soccerseasons/{}/fixtures/{}",
            season_id, fixture_id
        ))?)
        .await
    }

    pub async fn get_team(&self, team_id: u64) -> Result<Value> {
        self.get_json(self.resolve_url(&format!("teams/{}", team_id))?)
            .await
    }
}

/// Builds the URL every resource path is joined to
fn api_root(base_url: &str, api_version: &str) -> Result<Url> {
    let base = base_url.trim_end_matches('/');
    let version = api_version.trim_matches('/');
    let root = if version.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}/", base, version)
    };

    Url::parse(&root)
        .map_err(|e| FootballDataError::Config(format!("Invalid base URL '{}': {}", base_url, e)))
}

/// Builds the header set sent with every request
fn default_headers(auth_token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(RESPONSE_CONTROL_HEADER),
        HeaderValue::from_static("minified"),
    );

    if let Some(token) = auth_token {
        let mut value = HeaderValue::from_str(token).map_err(|_| {
            FootballDataError::Config("Auth token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), value);
    }

    Ok(headers)
}

/// Turns a response into its JSON body, failing on non-2xx statuses
fn decode_json(response: CachedResponse) -> Result<Value> {
    if !response.is_success() {
        return Err(FootballDataError::Upstream {
            status: response.status,
            url: response.url,
            body: response.body,
        });
    }
    Ok(response.json()?)
}

/// Pulls `standings[group]` out of a league table
fn extract_group(mut table: Value, group: &str) -> Result<Value> {
    table
        .get_mut("standings")
        .and_then(|standings| standings.get_mut(group))
        .map(Value::take)
        .ok_or_else(|| FootballDataError::GroupNotFound(group.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn client(base_url: &str, api_version: &str) -> FootballDataClient {
        FootballDataClient::new(
            ClientConfig::default()
                .with_base_url(base_url)
                .with_api_version(api_version),
        )
        .expect("Client should build")
    }

    #[test]
    fn test_resolve_url_joins_base_version_and_path() {
        let client = client("https://x.test", "v1");
        let url = client.resolve_url("teams/57").unwrap();
        assert_eq!(url.as_str(), "https://x.test/v1/teams/57");
    }

    #[test]
    fn test_resolve_url_tolerates_extra_slashes() {
        let client = client("https://x.test/", "/v1/");
        let url = client.resolve_url("/soccerseasons/").unwrap();
        assert_eq!(url.as_str(), "https://x.test/v1/soccerseasons/");
    }

    #[test]
    fn test_resolve_url_keeps_base_path_prefix() {
        let client = client("https://x.test/api", "v1");
        let url = client.resolve_url("teams/5").unwrap();
        assert_eq!(url.as_str(), "https://x.test/api/v1/teams/5");
    }

    #[test]
    fn test_fixtures_url_with_matchday() {
        let client = client("https://x.test", "v1");
        let url = client.fixtures_url(398, Some(5)).unwrap();
        assert_eq!(url.as_str(), "https://x.test/v1/soccerseasons/398/fixtures?matchday=5");
    }

    #[test]
    fn test_fixtures_url_without_matchday() {
        let client = client("https://x.test", "v1");
        let url = client.fixtures_url(398, None).unwrap();
        assert_eq!(url.as_str(), "https://x.test/v1/soccerseasons/398/fixtures");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = FootballDataClient::new(ClientConfig::default().with_base_url("not a url"));
        assert!(matches!(result, Err(FootballDataError::Config(_))));
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let result = FootballDataClient::new(ClientConfig::default().with_auth_token("bad\ntoken"));
        assert!(matches!(result, Err(FootballDataError::Config(_))));
    }

    #[test]
    fn test_default_headers_without_token() {
        let headers = default_headers(None).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[RESPONSE_CONTROL_HEADER], "minified");
        assert!(headers.get(AUTH_TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_default_headers_with_token() {
        let headers = default_headers(Some("secret")).unwrap();
        assert_eq!(headers[AUTH_TOKEN_HEADER], "secret");
        assert!(headers[AUTH_TOKEN_HEADER].is_sensitive());
    }

    #[test]
    fn test_extract_group_returns_named_group() {
        let table = json!({
            "standings": {
                "GROUP_A": [{"team": "A1"}],
                "GROUP_B": [{"team": "B1"}]
            }
        });
        let group = extract_group(table, "GROUP_A").unwrap();
        assert_eq!(group, json!([{"team": "A1"}]));
    }

    #[test]
    fn test_extract_group_missing_group() {
        let table = json!({"standings": {"GROUP_A": []}});
        let err = extract_group(table, "GROUP_Z").unwrap_err();
        assert!(matches!(err, FootballDataError::GroupNotFound(g) if g == "GROUP_Z"));
    }

    #[test]
    fn test_extract_group_without_standings() {
        let table = json!({"leagueCaption": "Premier League", "standing": []});
        assert!(matches!(
            extract_group(table, "GROUP_A"),
            Err(FootballDataError::GroupNotFound(_))
        ));
    }

    #[test]
    fn test_decode_json_rejects_error_status() {
        let response = CachedResponse {
            status: StatusCode::BAD_REQUEST,
            url: "https://x.test/v1/teams/0".to_string(),
            headers: Vec::new(),
            body: "{\"error\":\"bad\"}".to_string(),
            fetched_at: Utc::now(),
        };
        assert!(matches!(
            decode_json(response),
            Err(FootballDataError::Upstream { status, .. }) if status == StatusCode::BAD_REQUEST
        ));
    }

    #[test]
    fn test_decode_json_rejects_invalid_body() {
        let response = CachedResponse {
            status: StatusCode::OK,
            url: "https://x.test/v1/teams/1".to_string(),
            headers: Vec::new(),
            body: "<html>".to_string(),
            fetched_at: Utc::now(),
        };
        assert!(matches!(decode_json(response), Err(FootballDataError::Decode(_))));
    }
}
