use bytes::Bytes;
use conneg_core::content::{Content, IntoContent};
use conneg_core::exception::{NegotiationError, Result, StorageError};
use conneg_core::negotiation::MediaType;
use hyper::{HeaderMap, StatusCode};

use crate::{CONTENT_KEY, Extensions, header};

/// HTTP Response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Per-response storage; content waiting to be encoded lives here.
	pub extensions: Extensions,
	/// Indicates whether the middleware chain should stop processing
	/// When true, no further middleware or handlers will be executed
	stop_chain: bool,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			extensions: Extensions::new(),
			stop_chain: false,
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 201 Created status
	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	/// Create a Response with HTTP 400 Bad Request status
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::bad_request();
	/// assert_eq!(response.status, StatusCode::BAD_REQUEST);
	/// ```
	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	/// Create a Response with HTTP 406 Not Acceptable status
	///
	/// Returned when no encoder can produce any of the accepted media types.
	pub fn not_acceptable() -> Self {
		Self::new(StatusCode::NOT_ACCEPTABLE)
	}

	/// Create a Response with HTTP 415 Unsupported Media Type status
	///
	/// Returned when no decoder is registered for the request's
	/// `Content-Type`.
	pub fn unsupported_media_type() -> Self {
		Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE)
	}

	/// Create a Response with HTTP 500 Internal Server Error status
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("Hello, World!");
	/// assert_eq!(response.body, Bytes::from("Hello, World!"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a custom header to the response
	///
	/// Invalid names or values are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Response;
	///
	/// let response = Response::ok().with_header("X-Custom-Header", "custom-value");
	/// assert_eq!(
	///     response.headers.get("X-Custom-Header").unwrap().to_str().unwrap(),
	///     "custom-value"
	/// );
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Attach structured content to be encoded by a server negotiator
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_content(json!({"id": 3}));
	/// assert_eq!(response.content().unwrap(), Some(&json!({"id": 3})));
	/// assert!(response.body.is_empty());
	/// ```
	pub fn with_content(mut self, content: Content) -> Self {
		self.set_content(content);
		self
	}

	/// Attach the content form of `value`
	pub fn with_representable(self, value: &impl IntoContent) -> Self {
		self.with_content(value.to_content())
	}

	/// Content waiting to be encoded, or decoded from the body by a client
	/// negotiator
	///
	/// # Errors
	///
	/// Returns [`StorageError::TypeMismatch`] if something other than
	/// [`Content`] was stored under [`CONTENT_KEY`].
	pub fn content(&self) -> std::result::Result<Option<&Content>, StorageError> {
		self.extensions.get_keyed::<Content>(CONTENT_KEY)
	}

	pub fn set_content(&mut self, content: Content) {
		self.extensions.insert_keyed(CONTENT_KEY, content);
	}

	pub fn take_content(&mut self) -> std::result::Result<Option<Content>, StorageError> {
		self.extensions.remove_keyed::<Content>(CONTENT_KEY)
	}

	/// Parsed `Content-Type` header
	pub fn content_type(&self) -> std::result::Result<Option<MediaType>, NegotiationError> {
		header::content_type(&self.headers)
	}

	pub fn set_content_type(&mut self, media_type: &MediaType) -> Result<()> {
		header::set_content_type(&mut self.headers, media_type)
	}

	pub fn set_content_length(&mut self, length: usize) {
		header::set_content_length(&mut self.headers, length);
	}

	/// Check if this response should stop the middleware chain
	///
	/// When true, no further middleware or handlers will be executed.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Response;
	///
	/// let response = Response::ok();
	/// assert!(!response.should_stop_chain());
	///
	/// let stopping_response = Response::ok().with_stop_chain(true);
	/// assert!(stopping_response.should_stop_chain());
	/// ```
	pub fn should_stop_chain(&self) -> bool {
		self.stop_chain
	}

	/// Set whether this response should stop the middleware chain
	///
	/// Negotiators set this on the 415/400/406/500 responses they produce
	/// in place of the inner handler's.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Response;
	///
	/// let rejected = Response::unsupported_media_type()
	///     .with_body("unsupported content type")
	///     .with_stop_chain(true);
	/// assert!(rejected.should_stop_chain());
	/// ```
	pub fn with_stop_chain(mut self, stop: bool) -> Self {
		self.stop_chain = stop;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	struct Point(i64, i64);

	impl IntoContent for Point {
		fn to_content(&self) -> Content {
			json!({"x": self.0, "y": self.1})
		}
	}

	#[rstest]
	#[case(Response::ok(), StatusCode::OK)]
	#[case(Response::created(), StatusCode::CREATED)]
	#[case(Response::bad_request(), StatusCode::BAD_REQUEST)]
	#[case(Response::not_acceptable(), StatusCode::NOT_ACCEPTABLE)]
	#[case(Response::unsupported_media_type(), StatusCode::UNSUPPORTED_MEDIA_TYPE)]
	#[case(Response::internal_server_error(), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_status_constructors(#[case] response: Response, #[case] expected: StatusCode) {
		assert_eq!(response.status, expected);
		assert!(!response.should_stop_chain());
	}

	#[rstest]
	fn test_with_representable() {
		let response = Response::ok().with_representable(&Point(1, 2));

		assert_eq!(response.content().unwrap(), Some(&json!({"x": 1, "y": 2})));
	}

	#[rstest]
	fn test_take_content_clears_slot() {
		let mut response = Response::ok().with_content(json!("body"));

		assert_eq!(response.take_content().unwrap(), Some(json!("body")));
		assert_eq!(response.content().unwrap(), None);
	}

	#[rstest]
	fn test_content_headers() {
		let mut response = Response::ok();
		response.set_content_type(&MediaType::msgpack()).unwrap();
		response.set_content_length(12);

		assert_eq!(response.content_type(), Ok(Some(MediaType::msgpack())));
		assert_eq!(response.headers.get("content-length").unwrap(), "12");
	}

	#[rstest]
	fn test_with_header_ignores_invalid() {
		let response = Response::ok().with_header("bad name", "v");

		assert!(response.headers.is_empty());
	}
}
