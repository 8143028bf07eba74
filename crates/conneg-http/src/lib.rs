//! Request/response pipeline used by conneg.
//!
//! [`Request`] and [`Response`] carry a byte body, headers and an
//! [`Extensions`] store. Negotiated content travels between middleware in
//! that store under [`CONTENT_KEY`]; use the `content()` accessors rather
//! than the key directly.

pub mod extensions;
mod header;
pub mod middleware;
pub mod request;
pub mod response;

pub use conneg_core::exception::{Error, Result};
pub use extensions::Extensions;
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;

/// Storage key of the structured content on requests and responses.
pub const CONTENT_KEY: &str = "conneg.content";
