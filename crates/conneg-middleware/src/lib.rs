//! Content negotiation middleware for conneg.
//!
//! - [`ServerContentNegotiator`]: decodes request bodies by `Content-Type`,
//!   encodes response content by `Accept`, and answers 415 / 400 / 406 / 500
//!   when negotiation fails.
//! - [`ClientContentNegotiator`]: advertises `Accept`, encodes outbound
//!   content, decodes the reply.
//! - [`ContentMapperMiddleware`]: turns negotiated content into a typed
//!   value for the handler.
//! - [`NegotiationSettings`]: builds a registry from TOML.
//!
//! ```rust
//! use std::sync::Arc;
//! use conneg_http::{Handler, MiddlewareChain, Request, Response};
//! use conneg_middleware::{NegotiationSettings, ServerContentNegotiator};
//!
//! struct Endpoint;
//!
//! #[async_trait::async_trait]
//! impl Handler for Endpoint {
//!     async fn handle(&self, _request: Request) -> conneg_http::Result<Response> {
//!         Ok(Response::ok().with_content(serde_json::json!({"status": "up"})))
//!     }
//! }
//!
//! let settings = NegotiationSettings::default();
//! let chain = MiddlewareChain::new(Arc::new(Endpoint))
//!     .with_middleware(Arc::new(ServerContentNegotiator::from_settings(&settings).unwrap()));
//! ```

pub mod mapper;
pub mod negotiation;
pub mod settings;

pub use mapper::ContentMapperMiddleware;
pub use negotiation::{ClientContentNegotiator, ServerContentNegotiator};
pub use settings::{JsonSettings, NegotiationSettings};
