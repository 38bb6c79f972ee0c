mod application;

pub use application::ApplicationClient;
