//! Content negotiation middleware.
//!
//! [`ServerContentNegotiator`] decodes request bodies by `Content-Type` and
//! encodes response content by `Accept`. [`ClientContentNegotiator`] does
//! the mirror image around an outbound transport: it advertises what it can
//! read, encodes request content and decodes the reply.

use async_trait::async_trait;
use conneg_core::codec::{Decoder, Encoder};
use conneg_core::exception::{Error, Result};
use conneg_core::negotiation::{CodecRegistry, MediaType};
use conneg_http::{Handler, Middleware, Request, Response};
use std::sync::Arc;

use crate::settings::NegotiationSettings;

/// Server side negotiation.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use conneg_codecs::JsonCodec;
/// use conneg_core::negotiation::CodecRegistry;
/// use conneg_http::{Handler, Middleware, Request, Response};
/// use conneg_middleware::ServerContentNegotiator;
/// use hyper::{Method, StatusCode};
///
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl Handler for Echo {
///     async fn handle(&self, request: Request) -> conneg_http::Result<Response> {
///         let content = request.content()?.cloned().unwrap_or_default();
///         Ok(Response::ok().with_content(content))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let registry = CodecRegistry::builder().codec(JsonCodec::new()).build();
/// let negotiator = ServerContentNegotiator::new(Arc::new(registry));
///
/// let request = Request::builder()
///     .method(Method::POST)
///     .uri("/echo")
///     .header("content-type", "application/json")
///     .body(r#"{"x": 1}"#)
///     .build()
///     .unwrap();
///
/// let response = negotiator.process(request, Arc::new(Echo)).await.unwrap();
/// assert_eq!(response.status, StatusCode::OK);
/// assert_eq!(response.headers.get("content-type").unwrap(), "application/json");
/// assert_eq!(&response.body[..], br#"{"x":1}"#);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ServerContentNegotiator {
	registry: Arc<CodecRegistry>,
}

impl ServerContentNegotiator {
	pub fn new(registry: Arc<CodecRegistry>) -> Self {
		Self { registry }
	}

	/// Build from `(media type, decoder, encoder)` triples, in priority
	/// order
	pub fn from_codecs<I>(codecs: I) -> Self
	where
		I: IntoIterator<Item = (MediaType, Arc<dyn Decoder>, Arc<dyn Encoder>)>,
	{
		Self::new(Arc::new(CodecRegistry::from_codecs(codecs)))
	}

	/// Build from configuration
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] if a configured media type has no
	/// built-in codec.
	pub fn from_settings(settings: &NegotiationSettings) -> Result<Self> {
		Ok(Self::new(Arc::new(settings.build_registry()?)))
	}

	pub fn registry(&self) -> &Arc<CodecRegistry> {
		&self.registry
	}

	/// Decodes the body into the request's content slot, or returns the
	/// response that rejects the request.
	fn decode_request(&self, request: &mut Request) -> Option<Response> {
		if request.body.is_empty() {
			return None;
		}
		let media_type = match request.content_type() {
			Ok(Some(media_type)) => media_type,
			Ok(None) => {
				tracing::trace!(path = request.path(), "no content type, body left undecoded");
				return None;
			}
			Err(error) => return Some(reject(Error::from(error))),
		};

		match self.registry.decode(&request.body, &media_type) {
			Ok((_, content)) => {
				request.set_content(content);
				None
			}
			Err(error) => Some(reject(Error::from(error))),
		}
	}

	/// Encodes response content against `accepted`, replacing the body.
	fn encode_response(&self, mut response: Response, accepted: &[MediaType]) -> Result<Response> {
		let Some(content) = response.take_content()? else {
			return Ok(response);
		};

		match self.registry.encode(&content, accepted) {
			Ok((media_type, body)) => {
				response.set_content_type(&media_type)?;
				response.set_content_length(body.len());
				response.body = body;
				Ok(response)
			}
			Err(error) => Ok(reject(Error::from(error))),
		}
	}
}

#[async_trait]
impl Middleware for ServerContentNegotiator {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		if let Some(rejection) = self.decode_request(&mut request) {
			return Ok(rejection);
		}

		let mut accepted = request.accept();
		if accepted.is_empty() {
			accepted = self.registry.media_types();
		}

		let response = next.handle(request).await?;
		self.encode_response(response, &accepted)
	}
}

/// Empty response carrying the status for a negotiation failure; the chain
/// stops here.
fn reject(error: Error) -> Response {
	let response = match error.status_code() {
		400 => Response::bad_request(),
		406 => Response::not_acceptable(),
		415 => Response::unsupported_media_type(),
		_ => Response::internal_server_error(),
	};
	tracing::warn!(
		status = response.status.as_u16(),
		error = %error,
		"content negotiation failed"
	);
	response.with_stop_chain(true)
}

/// Client side negotiation, placed in front of the transport handler.
///
/// Failures are returned as errors; nothing is turned into a response.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use conneg_codecs::{JsonCodec, YamlCodec};
/// use conneg_core::negotiation::{CodecRegistry, MediaType};
/// use conneg_http::{Handler, Middleware, Request, Response};
/// use conneg_middleware::ClientContentNegotiator;
/// use serde_json::json;
///
/// // Stands in for the network: answers with YAML
/// struct Transport;
///
/// #[async_trait::async_trait]
/// impl Handler for Transport {
///     async fn handle(&self, request: Request) -> conneg_http::Result<Response> {
///         assert_eq!(request.headers.get("accept").unwrap(), "application/json, application/yaml");
///         assert_eq!(&request.body[..], br#"{"q":"rust"}"#);
///         Ok(Response::ok()
///             .with_header("content-type", "application/yaml")
///             .with_body("hits: 3\n"))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let registry = CodecRegistry::builder()
///     .bind(MediaType::json(), JsonCodec::new())
///     .bind(MediaType::yaml(), YamlCodec::new())
///     .build();
/// let negotiator = ClientContentNegotiator::new(Arc::new(registry));
///
/// let request = Request::builder().content(json!({"q": "rust"})).build().unwrap();
/// let response = negotiator.process(request, Arc::new(Transport)).await.unwrap();
///
/// assert_eq!(response.content().unwrap(), Some(&json!({"hits": 3})));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ClientContentNegotiator {
	registry: Arc<CodecRegistry>,
}

impl ClientContentNegotiator {
	pub fn new(registry: Arc<CodecRegistry>) -> Self {
		Self { registry }
	}

	pub fn from_codecs<I>(codecs: I) -> Self
	where
		I: IntoIterator<Item = (MediaType, Arc<dyn Decoder>, Arc<dyn Encoder>)>,
	{
		Self::new(Arc::new(CodecRegistry::from_codecs(codecs)))
	}

	pub fn from_settings(settings: &NegotiationSettings) -> Result<Self> {
		Ok(Self::new(Arc::new(settings.build_registry()?)))
	}

	pub fn registry(&self) -> &Arc<CodecRegistry> {
		&self.registry
	}

	fn encode_request(&self, request: &mut Request) -> Result<()> {
		request.set_accept(&self.registry.media_types())?;

		if let Some(content) = request.take_content()? {
			let (media_type, body) = self.registry.encode_preferred(&content)?;
			request.set_content_type(&media_type)?;
			request.set_content_length(body.len());
			request.body = body;
		}
		Ok(())
	}

	fn decode_response(&self, response: &mut Response) -> Result<()> {
		if response.body.is_empty() {
			return Ok(());
		}
		let Some(media_type) = response.content_type()? else {
			return Ok(());
		};

		let (_, content) = self.registry.decode(&response.body, &media_type)?;
		response.set_content(content);
		Ok(())
	}
}

#[async_trait]
impl Middleware for ClientContentNegotiator {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		self.encode_request(&mut request)?;
		let mut response = next.handle(request).await?;
		self.decode_response(&mut response)?;
		Ok(response)
	}
}
