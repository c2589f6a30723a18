//! Stateful HTTP session client for driving a content-repository server
//! through its HTTP/JSON API.
//!
//! [`Session`] owns a base URL, the currently active [`Identity`], and the
//! transport cookie jar. Scenarios switch identity mid-flight
//! ([`Session::switch_user`]) and issue plain verbs (`execute_get`,
//! `execute_post`, …) that hand back a uniform [`Response`] for any HTTP
//! status. Only transport-level failures (refused connection, DNS, timeout)
//! are errors; a 4xx/5xx is data for the caller to assert on.

pub mod config;
pub mod error;
pub mod identity;
pub mod params;
pub mod response;
pub mod session;

pub use config::SessionConfig;
pub use error::ClientError;
pub use identity::Identity;
pub use params::Params;
pub use response::Response;
pub use session::Session;
