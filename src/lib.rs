//! Switch API port reporter
//!
//! This library queries a switch management API for a switch's interfaces
//! and VLANs, joins the two resources into one record per physical port and
//! renders those records as a human-readable report.
//!
//! # Modules
//!
//! - [`config`] - Optional user defaults (base URL, username, TLS range)
//! - [`error`] - Custom error types for the library
//! - [`fetch`] - Authenticated HTTP queries against the API
//! - [`lookup`] - Port resolution by interface id or MAC address
//! - [`model`] - API wire types and the per-port record
//! - [`report`] - Report line rendering
//! - [`state`] - Merging interfaces and VLANs into the per-port view
//!
//! # Example Usage
//!
//! ```no_run
//! use switchtalk::{render_line, ApiConfig, Credentials, SwitchApiClient, SwitchState};
//!
//! let client = SwitchApiClient::new(ApiConfig {
//!     base_url: "https://api.example.net/switches/".to_string(),
//!     switch_name: "bg77-2e.dfw1".to_string(),
//!     credentials: Credentials::new("jdoe", "hunter2"),
//!     min_tls_version: None,
//!     max_tls_version: None,
//!     use_system_proxy: true,
//! })
//! .expect("Invalid configuration");
//!
//! let state = SwitchState::build(&client).expect("Query failed");
//! for record in state.ports().values() {
//!     println!("{}", render_line(record));
//! }
//! ```

/// Configuration module for user defaults.
/// Reads an optional TOML file from the user's config directory.
pub mod config;

/// Error module defining custom error types for the library.
/// Uses `thiserror` for ergonomic error handling.
pub mod error;

/// Fetch module for authenticated API queries.
/// Wraps a blocking `reqwest` client with Basic credentials and a scoped TLS range.
pub mod fetch;

/// Lookup module resolving interface ids and MAC addresses to port numbers.
pub mod lookup;

/// Model module with the JSON shapes of the API and the joined port record.
pub mod model;

/// Report module formatting port records for the terminal.
pub mod report;

/// State module building the per-port view from the `interfaces` and `vlans` resources.
pub mod state;

// Re-export the main error type for library users
pub use error::SwitchApiError;

// Re-export the client and its configuration
pub use fetch::{ApiConfig, Credentials, Fetch, SwitchApiClient, TlsVersion};

pub use lookup::{find_by_interface, find_by_mac};
pub use model::{PortMap, PortRecord};
pub use report::{render_line, render_mac_list};
pub use state::SwitchState;
