//! # conneg
//!
//! Bidirectional HTTP content negotiation.
//!
//! On the server, [`ServerContentNegotiator`] decodes an incoming body into
//! format-agnostic [`Content`] according to its `Content-Type`, lets the
//! handler work on that value, and encodes the response content into the
//! first media type from the caller's `Accept` list that a registered
//! encoder can produce. On the client, [`ClientContentNegotiator`] does the
//! reverse around a transport handler.
//!
//! ## Crates
//!
//! - `conneg-core`: media types, the codec registry, content traits, errors
//! - `conneg-http`: [`Request`], [`Response`], [`Handler`], [`Middleware`]
//! - `conneg-codecs` (feature `codecs`): JSON, YAML, MessagePack, form
//! - `conneg-middleware` (feature `middleware`): negotiators, mapper,
//!   settings
//!
//! ## Quick Example
//!
//! ```rust
//! use conneg::prelude::*;
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Handler for Echo {
//!     async fn handle(&self, request: Request) -> Result<Response> {
//!         let content = request.content()?.cloned().unwrap_or_default();
//!         Ok(Response::ok().with_content(content))
//!     }
//! }
//!
//! let registry = CodecRegistry::builder()
//!     .codec(JsonCodec::new())
//!     .codec(YamlCodec::new())
//!     .build();
//!
//! let app = MiddlewareChain::new(Arc::new(Echo))
//!     .with_middleware(Arc::new(ServerContentNegotiator::new(Arc::new(registry))));
//! # let _ = app;
//! ```

pub use conneg_core::codec::{Codec, Decoder, Encoder};
pub use conneg_core::content::{
	Content, ContentMappable, FromContent, IntoContent, collect_content,
	from_content_deserialize, to_content_serialize,
};
pub use conneg_core::exception::{
	CodecError, CodecResult, ContentError, Error, NegotiationError, Result, StorageError,
};
pub use conneg_core::negotiation::{
	AcceptHeader, CodecBinding, CodecRegistry, CodecRegistryBuilder, MediaType,
};
pub use conneg_http::{
	CONTENT_KEY, Extensions, Handler, Middleware, MiddlewareChain, Request, RequestBuilder,
	Response,
};

#[cfg(feature = "codecs")]
pub use conneg_codecs::{FormCodec, JsonCodec, MessagePackCodec, YamlCodec, builtin_codec};

#[cfg(feature = "middleware")]
pub use conneg_middleware::{
	ClientContentNegotiator, ContentMapperMiddleware, JsonSettings, NegotiationSettings,
	ServerContentNegotiator,
};

/// Commonly used types and traits
pub mod prelude {
	pub use crate::{
		Codec, CodecError, CodecRegistry, Content, ContentError, ContentMappable, Decoder, Encoder,
		Error, FromContent, Handler, IntoContent, MediaType, Middleware, MiddlewareChain,
		NegotiationError, Request, Response, Result, from_content_deserialize,
	};

	#[cfg(feature = "codecs")]
	pub use crate::{FormCodec, JsonCodec, MessagePackCodec, YamlCodec};

	#[cfg(feature = "middleware")]
	pub use crate::{
		ClientContentNegotiator, ContentMapperMiddleware, NegotiationSettings,
		ServerContentNegotiator,
	};

	// External
	pub use async_trait::async_trait;
	pub use hyper::StatusCode;
}
