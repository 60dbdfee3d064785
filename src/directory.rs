//! Directory endpoint client
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into [`User`] records. Everything
//! above it talks to the [`UserSource`] trait, which is also the seam the
//! tests use to stand in for the network.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::error::{Result, RolodexError};
use crate::model::User;
use crate::AppConfig;

const DEFAULT_USER_AGENT: &str = concat!("rolodex/", env!("CARGO_PKG_VERSION"));

/// Read-only source of directory entries matching a query string.
pub trait UserSource: Send {
    /// Look up users whose name matches `query`. An empty match is a valid
    /// zero-result state, not an error.
    fn search(&self, query: &str) -> Result<Vec<User>>;
}

/// Directory adapter that performs HTTP GET requests against one endpoint.
pub struct HttpDirectory {
    client: Client,
    endpoint: Url,
    max_results: usize,
}

impl HttpDirectory {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URL does not parse or the HTTP
    /// client cannot be constructed.
    pub fn new(endpoint: &str, timeout: Duration, max_results: usize) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| RolodexError::InvalidEndpoint(endpoint.to_string(), e))?;
        if endpoint.cannot_be_a_base() {
            return Err(RolodexError::InvalidEndpoint(
                endpoint.to_string(),
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(RolodexError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint,
            max_results,
        })
    }

    /// Build an adapter from the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.request_timeout, config.max_results)
    }

    /// The `/users` resource under the configured endpoint.
    fn users_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users");
        }
        url
    }
}

impl UserSource for HttpDirectory {
    fn search(&self, query: &str) -> Result<Vec<User>> {
        if query.trim().is_empty() {
            // Never enumerate the whole directory for a blank input.
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.users_url())
            .query(&[("name_like", query)])
            .send()
            .map_err(RolodexError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RolodexError::Status {
                status: status.as_u16(),
                query: query.to_string(),
            });
        }

        let body = response.bytes().map_err(RolodexError::Transport)?;
        let mut users = parse_users(body.as_ref())?;
        users.truncate(self.max_results);
        Ok(users)
    }
}

/// Decode a directory response body into user records.
pub fn parse_users(body: &[u8]) -> Result<Vec<User>> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(endpoint: &str) -> HttpDirectory {
        HttpDirectory::new(endpoint, Duration::from_secs(1), 50).unwrap()
    }

    #[test]
    fn users_url_appends_resource() {
        let dir = directory("https://directory.example.com");
        assert_eq!(
            dir.users_url().as_str(),
            "https://directory.example.com/users"
        );
    }

    #[test]
    fn users_url_respects_base_path() {
        // Trailing slash or not, the resource lands under the base path.
        let dir = directory("https://directory.example.com/api/v2/");
        assert_eq!(
            dir.users_url().as_str(),
            "https://directory.example.com/api/v2/users"
        );

        let dir = directory("https://directory.example.com/api/v2");
        assert_eq!(
            dir.users_url().as_str(),
            "https://directory.example.com/api/v2/users"
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = HttpDirectory::new("definitely not a url", Duration::from_secs(1), 50);
        assert!(matches!(err, Err(RolodexError::InvalidEndpoint(_, _))));
    }

    #[test]
    fn blank_query_short_circuits() {
        // Unroutable endpoint on purpose: a blank query must not touch it.
        let dir = directory("http://127.0.0.1:1");
        assert!(dir.search("").unwrap().is_empty());
        assert!(dir.search("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_users_decodes_arrays() {
        let body = br#"[
            {"id": 1, "name": "Leanne Graham", "username": "Bret"},
            {"id": 2, "name": "Ervin Howell", "username": "Antonette"}
        ]"#;
        let users = parse_users(body).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "Ervin Howell");
    }

    #[test]
    fn parse_users_rejects_malformed_bodies() {
        assert!(parse_users(b"<html>busy</html>").is_err());
        assert!(parse_users(br#"[{"id": 1, "username": "Bret"}]"#).is_err());
    }
}
