//! Backend collaborators for the Aegis console: the REST client used in
//! online sessions and the local demo responder used in degraded ones.

pub mod demo;
pub mod http_backend;

pub use demo::{DemoResponder, DemoTemplate};
pub use http_backend::HttpBackend;
