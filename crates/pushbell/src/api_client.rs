//! REST client for the push service.
//!
//! Fetches push history and the tables used to resolve notification icons.

use crate::{AppError, AppResult, config::StreamConfig};

use std::panic::Location;

use error_location::ErrorLocation;
use pushbell_core::{
    IconLookup, PushRecord,
    notification::{Account, Device, Grant},
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};

const ACCESS_TOKEN_HEADER: &str = "Access-Token";

#[derive(Debug, Deserialize)]
struct PushesResponse {
    #[serde(default)]
    pushes: Vec<PushRecord>,
}

#[derive(Debug, Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
struct GrantsResponse {
    #[serde(default)]
    grants: Vec<Grant>,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    #[serde(default)]
    accounts: Vec<Account>,
}

/// Authenticated client for the push service REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client that sends the access token with every request.
    #[track_caller]
    pub fn new(config: &StreamConfig) -> AppResult<Self> {
        let mut token = HeaderValue::from_str(config.access_token.trim()).map_err(|e| {
            AppError::ConfigError {
                reason: format!("Access token is not a valid header value: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::ApiError {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Active pushes modified after `modified_after`, newest first.
    ///
    /// `limit` of 0 leaves the page size to the server.
    #[instrument(skip(self))]
    pub async fn pushes(&self, modified_after: f64, limit: usize) -> AppResult<Vec<PushRecord>> {
        let mut query = vec![
            ("active", "true".to_string()),
            ("modified_after", modified_after.to_string()),
        ];
        if limit > 0 {
            query.push(("limit", limit.to_string()));
        }

        let response: PushesResponse = self.get("pushes", &query).await?;

        debug!(count = response.pushes.len(), "Pushes fetched");

        Ok(response.pushes)
    }

    /// Devices, grants and accounts used for icon resolution.
    #[instrument(skip(self))]
    pub async fn lookup_tables(&self) -> AppResult<IconLookup> {
        let (devices, grants, accounts) = tokio::try_join!(
            self.get::<DevicesResponse>("devices", &[]),
            self.get::<GrantsResponse>("grants", &[]),
            self.get::<AccountsResponse>("accounts", &[]),
        )?;

        debug!(
            devices = devices.devices.len(),
            grants = grants.grants.len(),
            accounts = accounts.accounts.len(),
            "Lookup tables fetched"
        );

        Ok(IconLookup {
            accounts: accounts.accounts,
            grants: grants.grants,
            devices: devices.devices,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.url(path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ApiError {
                reason: format!("GET {} returned {}: {}", url, status, body),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(response.json::<T>().await?)
    }
}
