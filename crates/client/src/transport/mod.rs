mod http;

pub use http::{HttpTransport, TransportConfig};

use crate::cancel::CancelableRequest;
use crate::request::RequestDescriptor;
use serde::de::DeserializeOwned;

/// Executes request descriptors
///
/// Implementations resolve the URL template, encode the body, perform the
/// call, and turn the response into `T` or an [`crate::ApiError`]. A
/// transport is shared by every in-flight call, so it must be safe to use
/// concurrently.
pub trait Transport: Send + Sync + 'static {
    fn execute<T>(&self, descriptor: RequestDescriptor) -> CancelableRequest<T>
    where
        T: DeserializeOwned + Send + 'static;
}
