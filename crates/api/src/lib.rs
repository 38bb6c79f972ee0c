//! Wire types for the application/token REST API.
//!
//! Every type here is a request or response transient: the server creates
//! it, it crosses the wire as JSON, and the client discards it after use.

mod models;

pub use models::{
    ApplicationCreate, ApplicationData, ApplicationPage, MessageResponse, TokenResponse,
    CURRENT_USER,
};
