//! Thin client for VLC's Lua HTTP remote-control interface.
//!
//! Commands are documented in VLC's share/lua/http/requests/README.txt.
//! Authentication is HTTP basic auth with an empty username and the
//! password configured in VLC.

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

/// Status endpoint, relative to the base URL.
const STATUS_PATH: &str = "requests/status.json";

/// Errors talking to VLC. Network failures, non-2xx responses, and
/// non-JSON bodies all land here; there are no retries.
#[derive(Debug, Error)]
pub enum VlcError {
    #[error("VLC request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for one VLC instance.
#[derive(Debug, Clone)]
pub struct VlcClient {
    client: Client,
    base_url: String,
    password: String,
}

impl VlcClient {
    pub fn new(host: &str, port: u16, password: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("http://{}:{}", host, port),
            password: password.to_string(),
        }
    }

    /// Issue a status command and return the JSON-decoded response.
    ///
    /// `params` are appended to the query string after `command`.
    pub fn status_cmd(&self, command: &str, params: &[(String, String)]) -> Result<Value, VlcError> {
        let url = format!("{}/{}", self.base_url, STATUS_PATH);
        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.password))
            .query(&[("command", command)])
            .query(params)
            .send()?
            .error_for_status()?;

        Ok(response.json()?)
    }
}
