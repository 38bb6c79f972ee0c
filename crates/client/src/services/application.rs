use crate::cancel::CancelableRequest;
use crate::requests;
use crate::request::RequestDescriptor;
use crate::transport::Transport;
use keyward_api::{
    ApplicationCreate, ApplicationData, ApplicationPage, MessageResponse, TokenResponse,
    CURRENT_USER,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Client for the application endpoints
///
/// Each method builds a [`RequestDescriptor`] and returns the transport's
/// [`CancelableRequest`] untouched: no retries, no caching, no local error
/// handling. Cloning is cheap and clones share the transport, so a client
/// can be handed to many concurrent tasks.
pub struct ApplicationClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for ApplicationClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> ApplicationClient<T> {
    /// Create a new `ApplicationClient`
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Create a client over a transport that is already shared
    #[must_use]
    pub fn from_shared(transport: Arc<T>) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create an application
    ///
    /// # Returns
    /// * `Ok(ApplicationData)` - The new application, owned by the caller
    /// * `Err(ApiError::Declared { status: 400, .. })` - Token limit reached or invalid name
    ///
    /// # Examples
    /// ```ignore
    /// let client = ApplicationClient::new(HttpTransport::new(config)?);
    /// let app = client.create(&ApplicationCreate::new("ci-bot")).await?;
    /// println!("Created app: {} with id {}", app.name, app.id);
    /// ```
    pub fn create(&self, payload: &ApplicationCreate) -> CancelableRequest<ApplicationData> {
        match requests::create(payload) {
            Ok(descriptor) => self.execute(descriptor),
            Err(e) => CancelableRequest::ready(Err(e)),
        }
    }

    /// Get application info
    pub fn info(&self, application_id: &str) -> CancelableRequest<ApplicationData> {
        self.execute(requests::info(application_id))
    }

    /// Delete an application
    ///
    /// A 401 means the caller is unauthorized or the application does not
    /// exist.
    pub fn delete(&self, application_id: &str) -> CancelableRequest<MessageResponse> {
        self.execute(requests::delete(application_id))
    }

    /// Get the token for an application
    pub fn token(&self, application_id: &str) -> CancelableRequest<TokenResponse> {
        self.execute(requests::token(application_id))
    }

    /// List a user's applications, one page at a time (pages start at 1)
    pub fn list(&self, page_number: &str, user_id: &str) -> CancelableRequest<ApplicationPage> {
        self.execute(requests::list(page_number, user_id))
    }

    /// List the caller's own applications
    pub fn list_own(&self, page_number: &str) -> CancelableRequest<ApplicationPage> {
        self.list(page_number, CURRENT_USER)
    }

    fn execute<R>(&self, descriptor: RequestDescriptor) -> CancelableRequest<R>
    where
        R: DeserializeOwned + Send + 'static,
    {
        debug!(method = %descriptor.method, url = descriptor.url, "Dispatching request");
        self.transport.execute(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::Mutex;

    /// Records every descriptor and rejects it with a 418
    #[derive(Default)]
    struct RecordingTransport {
        seen: Mutex<Vec<RequestDescriptor>>,
    }

    impl Transport for RecordingTransport {
        fn execute<R>(&self, descriptor: RequestDescriptor) -> CancelableRequest<R>
        where
            R: DeserializeOwned + Send + 'static,
        {
            let error = descriptor.error_for_status(418, String::new());
            self.seen.lock().unwrap().push(descriptor);
            CancelableRequest::ready(Err(error))
        }
    }

    #[tokio::test]
    async fn test_list_own_uses_current_user_alias() {
        let client = ApplicationClient::new(RecordingTransport::default());

        let result = client.list_own("2").await;
        assert!(matches!(result, Err(ApiError::Status { status: 418, .. })));

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path["user_id"], CURRENT_USER);
        assert_eq!(seen[0].resolve_url().unwrap(), "/api/user/@me/application/2");
    }

    #[tokio::test]
    async fn test_clones_share_transport() {
        let client = ApplicationClient::new(RecordingTransport::default());
        let clone = client.clone();

        let _ = clone.info("app-1").await;
        let _ = client.token("app-2").await;

        assert!(std::ptr::eq(client.transport(), clone.transport()));
        assert_eq!(client.transport().seen.lock().unwrap().len(), 2);
    }
}
