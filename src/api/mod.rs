//! HTTP access to the scan service.
//!
//! ## Architecture
//!
//! - `transport`: the `Transport` seam and its reqwest implementation
//! - `client`: `ApiClient`, which validates the login token, builds the
//!   authenticated request for `{entry_point}/{version}/{page}/{id}/{action}`
//!   and maps non-200 answers to `ScanError::RemoteCommandFailed`

pub mod client;
pub mod transport;

pub use client::ApiClient;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
