//! Source images - selection and base64 caching

pub mod cache;
pub mod selector;

pub use cache::Base64Cache;
pub use selector::{ImageResource, ImageSelector};
