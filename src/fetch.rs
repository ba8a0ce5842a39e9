//! Authenticated access to the switch management API.
//!
//! Every request is an HTTP GET against
//! `<base_url><switch>[/<resource>[/<arg>]]` carrying HTTP Basic
//! credentials. Bodies are returned verbatim; callers decide how to parse
//! them.
//!
//! # Example
//!
//! ```no_run
//! use switchtalk::fetch::{ApiConfig, Credentials, Fetch, SwitchApiClient};
//!
//! let client = SwitchApiClient::new(ApiConfig {
//!     base_url: "https://api.example.net/switches/".to_string(),
//!     switch_name: "bg77-2e.dfw1".to_string(),
//!     credentials: Credentials::new("jdoe", "hunter2"),
//!     min_tls_version: None,
//!     max_tls_version: None,
//!     use_system_proxy: true,
//! })
//! .expect("Invalid client configuration");
//!
//! let body = client.fetch(Some("interfaces"), None).expect("Query failed");
//! println!("{}", body);
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use tracing::debug;

use crate::error::SwitchApiError;

pub const MISSING_SWITCH_NAME: &str = "Switch Name not supplied.  ex: bg77-2e.dfw1";

/// Source of raw API response bodies.
///
/// [`SwitchApiClient`] is the network implementation; the state builder
/// only depends on this trait.
pub trait Fetch {
    fn fetch(&self, resource: Option<&str>, arg: Option<&str>) -> Result<String, SwitchApiError>;
}

/// HTTP Basic credentials for the API.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// TLS protocol versions the client can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum TlsVersion {
    #[serde(rename = "1.2")]
    #[value(name = "1.2")]
    Tls12,

    #[serde(rename = "1.3")]
    #[value(name = "1.3")]
    Tls13,
}

impl From<TlsVersion> for reqwest::tls::Version {
    fn from(version: TlsVersion) -> Self {
        match version {
            TlsVersion::Tls12 => reqwest::tls::Version::TLS_1_2,
            TlsVersion::Tls13 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

/// Everything needed to talk to one switch.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub switch_name: String,
    pub credentials: Credentials,
    pub min_tls_version: Option<TlsVersion>,
    pub max_tls_version: Option<TlsVersion>,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_system_proxy: bool,
}

/// Blocking client bound to a single switch.
pub struct SwitchApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    switch_name: String,
    credentials: Credentials,
}

impl SwitchApiClient {
    /// Validates `config` and builds the underlying HTTP client.
    ///
    /// The TLS version range applies to this client only. A base URL
    /// without a trailing slash gets one appended.
    pub fn new(config: ApiConfig) -> Result<Self, SwitchApiError> {
        let switch_name = config.switch_name.trim();
        if switch_name.is_empty() {
            return Err(SwitchApiError::Configuration(MISSING_SWITCH_NAME.to_string()));
        }

        if let (Some(min), Some(max)) = (config.min_tls_version, config.max_tls_version) {
            if min > max {
                return Err(SwitchApiError::Configuration(format!(
                    "Minimum TLS version {:?} is newer than maximum {:?}",
                    min, max
                )));
            }
        }

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(min) = config.min_tls_version {
            builder = builder.min_tls_version(min.into());
        }
        if let Some(max) = config.max_tls_version {
            builder = builder.max_tls_version(max.into());
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build().map_err(|e| {
            SwitchApiError::Configuration(format!("Failed to build HTTP client: {}", error_chain(&e)))
        })?;

        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(SwitchApiClient {
            http,
            base_url,
            switch_name: switch_name.to_string(),
            credentials: config.credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn switch_name(&self) -> &str {
        &self.switch_name
    }
}

impl Fetch for SwitchApiClient {
    fn fetch(&self, resource: Option<&str>, arg: Option<&str>) -> Result<String, SwitchApiError> {
        let url = request_url(&self.base_url, &self.switch_name, resource, arg);
        debug!(%url, "querying switch API");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .map_err(|e| connection_error(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwitchApiError::HttpStatus {
                code: status.as_u16(),
                // reqwest does not expose the server's reason text, only the code.
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().map_err(|e| connection_error(&url, &e))?;

        String::from_utf8(body.to_vec()).map_err(|source| SwitchApiError::InvalidBody { url, source })
    }
}

/// Joins the request URL. `arg` is only used when `resource` is given.
pub fn request_url(base_url: &str, switch_name: &str, resource: Option<&str>, arg: Option<&str>) -> String {
    let mut url = format!("{}{}", base_url, switch_name);

    if let Some(resource) = resource {
        url.push('/');
        url.push_str(resource);
        if let Some(arg) = arg {
            url.push('/');
            url.push_str(arg);
        }
    }

    url
}

fn connection_error(url: &str, err: &reqwest::Error) -> SwitchApiError {
    SwitchApiError::Connection {
        url: url.to_string(),
        reason: error_chain(err),
    }
}

/// Flattens an error and its sources into `outer: inner: root`.
fn error_chain(err: &dyn StdError) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !reason.ends_with(&text) {
            reason.push_str(": ");
            reason.push_str(&text);
        }
        source = cause.source();
    }

    reason
}
