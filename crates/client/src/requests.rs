//! Request descriptors for the application endpoints.
//!
//! Pure builders, one per operation. [`crate::ApplicationClient`] passes
//! their output straight to its transport.

use crate::error::Result;
use crate::request::RequestDescriptor;
use keyward_api::ApplicationCreate;
use reqwest::Method;

pub const APPLICATION: &str = "/api/application";
pub const APPLICATION_BY_ID: &str = "/api/application/{application_id}";
pub const APPLICATION_TOKEN: &str = "/api/application/{application_id}/token";
pub const USER_APPLICATIONS: &str = "/api/user/{user_id}/application/{page_number}";

/// `POST /api/application`
pub fn create(payload: &ApplicationCreate) -> Result<RequestDescriptor> {
    Ok(RequestDescriptor::new(Method::POST, APPLICATION)
        .json_body(payload)?
        .error(400, "Token limit reached or invalid name"))
}

/// `GET /api/application/{application_id}`
#[must_use]
pub fn info(application_id: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, APPLICATION_BY_ID)
        .path_param("application_id", application_id)
}

/// `DELETE /api/application/{application_id}`
#[must_use]
pub fn delete(application_id: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::DELETE, APPLICATION_BY_ID)
        .path_param("application_id", application_id)
        .error(401, "Unauthorized or token does not exist")
}

/// `GET /api/application/{application_id}/token`
#[must_use]
pub fn token(application_id: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, APPLICATION_TOKEN)
        .path_param("application_id", application_id)
        .error(404, "Application not found")
}

/// `GET /api/user/{user_id}/application/{page_number}`
///
/// Pages start at 1. `user_id` may be [`keyward_api::CURRENT_USER`].
#[must_use]
pub fn list(page_number: &str, user_id: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::GET, USER_APPLICATIONS)
        .path_param("page_number", page_number)
        .path_param("user_id", user_id)
}
