//! Typed client for the application/token REST API.
//!
//! [`ApplicationClient`] maps each endpoint to a method. It only builds a
//! [`RequestDescriptor`] and hands it to a [`Transport`]; URL substitution,
//! body encoding and status classification all happen in the transport.

mod cancel;
mod error;
mod request;
pub mod requests;
mod services;
mod transport;

pub use cancel::{CancelHandle, CancelableRequest};
pub use error::{ApiError, Result};
pub use request::{build_url, RequestDescriptor, MEDIA_TYPE_JSON};
pub use services::ApplicationClient;
pub use transport::{HttpTransport, Transport, TransportConfig};

pub use keyward_api as api;
