use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    config::ServiceAccountKey,
    error::{Error, Result},
    model::TrackListing,
};

const SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";
const API_ROOT: &str = "androidpublisher";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AppEdit {
    id: String,
}

/// Read-only client for the Android Publisher v3 API.
pub struct PlayClient {
    http: Client,
    base_url: Url,
    key: ServiceAccountKey,
    static_token: Option<String>,
}

impl PlayClient {
    pub fn new(key: ServiceAccountKey) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("playtracks/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()?;
        let base_url = Url::parse("https://androidpublisher.googleapis.com/")
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            key,
            static_token: None,
        })
    }

    pub fn with_static_token(mut self, token: impl Into<String>) -> Self {
        self.static_token = Some(token.into());
        self
    }

    /// Overrides the base URL for API requests. Useful for tests with a mock server.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Exchanges a signed assertion for an OAuth access token.
    pub async fn bearer(&self) -> Result<String> {
        if let Some(tok) = &self.static_token {
            return Ok(tok.clone());
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Auth(e.to_string()))?
            .as_secs();
        // Google caps assertion lifetime at one hour.
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + 3600,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| Error::Credentials(format!("private_key is not an RSA PEM key: {e}")))?;
        let assertion = encode(&header, &claims, &key)
            .map_err(|e| Error::Auth(format!("failed to sign assertion: {e}")))?;

        let res = self
            .http
            .post(self.key.token_uri.as_str())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(Error::Auth(format!("token exchange failed {status}: {text}")));
        }
        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| Error::Auth(format!("unexpected token response: {e}")))?;
        tracing::debug!(email = %self.key.client_email, "access token issued");
        Ok(token.access_token)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String> {
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(Error::Api { status, body: text });
        }
        tracing::debug!(%status, bytes = text.len(), "request ok");
        Ok(text)
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, segments: &[&str], bearer: &str) -> Result<Value> {
        let req = self.http.get(self.url(segments)?).bearer_auth(bearer);
        let text = self.send(req).await?;
        serde_json::from_str(&text).map_err(Error::Decode)
    }

    pub async fn post(&self, segments: &[&str], bearer: &str, body: Value) -> Result<Value> {
        let req = self.http.post(self.url(segments)?).bearer_auth(bearer).json(&body);
        let text = self.send(req).await?;
        serde_json::from_str(&text).map_err(Error::Decode)
    }

    /// Opens an edit session; the API only serves tracks within one.
    pub async fn insert_edit(&self, package_name: &str, bearer: &str) -> Result<String> {
        let path = [API_ROOT, "v3", "applications", package_name, "edits"];
        let v = self.post(&path, bearer, json!({})).await?;
        let edit: AppEdit = serde_json::from_value(v).map_err(Error::Decode)?;
        Ok(edit.id)
    }

    pub async fn list_tracks(
        &self,
        package_name: &str,
        edit_id: &str,
        bearer: &str,
    ) -> Result<TrackListing> {
        let path = [API_ROOT, "v3", "applications", package_name, "edits", edit_id, "tracks"];
        let v = self.get(&path, bearer).await?;
        serde_json::from_value(v).map_err(Error::Decode)
    }

    pub async fn fetch_track_listing(&self, package_name: &str) -> Result<TrackListing> {
        let bearer = self.bearer().await?;
        let edit_id = self.insert_edit(package_name, &bearer).await?;
        tracing::debug!(package_name, %edit_id, "edit created");
        self.list_tracks(package_name, &edit_id, &bearer).await
    }
}

/// Fetches the track listing, giving up once `deadline` has elapsed.
pub async fn fetch_track_listing(
    package_name: &str,
    key: ServiceAccountKey,
    deadline: Duration,
) -> Result<TrackListing> {
    let client = PlayClient::new(key)?;
    fetch_with(&client, package_name, deadline).await
}

pub async fn fetch_with(
    client: &PlayClient,
    package_name: &str,
    deadline: Duration,
) -> Result<TrackListing> {
    tokio::time::timeout(deadline, client.fetch_track_listing(package_name))
        .await
        .map_err(|_| Error::Timeout(deadline))?
}
