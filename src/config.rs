use std::{env, fs, time::Duration};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    view::View,
};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Everything one run needs, validated before any request is made.
#[derive(Debug, Clone)]
pub struct Config {
    pub package_name: String,
    pub view: View,
    pub jmespath_expr: String,
    pub time_limit: Duration,
    pub credentials: ServiceAccountKey,
}

impl Config {
    /// Checks package name, output style, then credentials, in that order.
    ///
    /// `credentials` falls back to `$CREDENTIALS` when empty so the secret
    /// never appears as a default in the usage text.
    pub fn new(
        package_name: &str,
        output_style: &str,
        jmespath_expr: &str,
        time_limit: Duration,
        credentials: &str,
    ) -> Result<Self> {
        if package_name.is_empty() {
            return Err(Error::MissingPackageName);
        }
        let view = View::resolve(output_style)?;
        let credentials = if credentials.is_empty() {
            env::var("CREDENTIALS").unwrap_or_default()
        } else {
            credentials.to_string()
        };
        if credentials.is_empty() {
            return Err(Error::MissingCredentials);
        }
        let credentials = ServiceAccountKey::from_json(&resolve_credentials(&credentials)?)?;

        Ok(Self {
            package_name: package_name.to_string(),
            view,
            jmespath_expr: jmespath_expr.to_string(),
            time_limit,
            credentials,
        })
    }
}

/// Expands a credentials argument into the key JSON.
///
/// `@env:NAME` reads `$NAME`, `@file:PATH` reads the file, anything else is
/// taken as the JSON itself.
pub fn resolve_credentials(arg: &str) -> Result<String> {
    if let Some(name) = arg.strip_prefix("@env:") {
        let value = env::var(name).unwrap_or_default();
        if value.is_empty() {
            return Err(Error::Credentials(format!(
                "environment variable {name} is empty or unset"
            )));
        }
        return Ok(value);
    }
    if let Some(path) = arg.strip_prefix("@file:") {
        return fs::read_to_string(path)
            .map_err(|e| Error::Credentials(format!("cannot read {path}: {e}")));
    }
    Ok(arg.to_string())
}

/// The fields of a Google service account key file that signing needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Credentials(format!("not a service account key: {e}")))
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
