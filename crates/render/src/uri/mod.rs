//! URI handling: templates, argument extraction, and href resolution.

pub mod argmap;
pub mod request;
pub mod template;

pub use argmap::ArgMap;
pub use request::RequestUri;
pub use template::UriTemplate;
