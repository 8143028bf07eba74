//! Pipeline request type.

mod content;

use bytes::Bytes;
use conneg_core::content::Content;
use conneg_core::exception::{Error, Result};
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};

use crate::Extensions;

/// HTTP Request representation
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Per-request storage; negotiated content and mapped objects live here.
	pub extensions: Extensions,
}

impl Request {
	/// Create a new request from its parts
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::POST,
	///     Uri::from_static("/items"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::from_static(b"{}"),
	/// );
	/// assert_eq!(request.path(), "/items");
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			extensions: Extensions::new(),
		}
	}

	/// Start building a request
	///
	/// Defaults to `GET / HTTP/1.1` with no headers and an empty body.
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Replace the body
	pub fn set_body(&mut self, body: impl Into<Bytes>) {
		self.body = body.into();
	}
}

/// Builder for [`Request`]
///
/// # Examples
///
/// ```
/// use conneg_http::Request;
/// use hyper::Method;
///
/// let request = Request::builder()
///     .method(Method::POST)
///     .uri("/api/login")
///     .header("content-type", "application/json")
///     .body(r#"{"user":"ann"}"#)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.method, Method::POST);
/// assert_eq!(request.headers.get("content-type").unwrap(), "application/json");
/// ```
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: std::result::Result<Uri, String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	content: Option<Content>,
	error: Option<String>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: Ok(Uri::from_static("/")),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			content: None,
			error: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Set the request URI; parse errors surface from [`build`](Self::build)
	pub fn uri<U>(mut self, uri: U) -> Self
	where
		U: TryInto<Uri>,
		U::Error: std::fmt::Display,
	{
		self.uri = uri.try_into().map_err(|e| e.to_string());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Replace all headers
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append a single header; an invalid name or value fails the build
	pub fn header(mut self, name: &str, value: &str) -> Self {
		match (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.append(name, value);
			}
			_ => {
				self.error
					.get_or_insert_with(|| format!("invalid header {name}: {value:?}"));
			}
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Attach structured content to be encoded by a client negotiator
	pub fn content(mut self, content: Content) -> Self {
		self.content = Some(content);
		self
	}

	/// Build the request
	///
	/// # Errors
	///
	/// Returns [`Error::Http`] if the URI or a header could not be parsed.
	pub fn build(self) -> Result<Request> {
		if let Some(error) = self.error {
			return Err(Error::Http(error));
		}
		let uri = self
			.uri
			.map_err(|e| Error::Http(format!("invalid URI: {e}")))?;
		let mut request = Request::new(self.method, uri, self.version, self.headers, self.body);
		if let Some(content) = self.content {
			request.set_content(content);
		}
		Ok(request)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_builder_defaults() {
		let request = Request::builder().build().unwrap();

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.path(), "/");
		assert_eq!(request.version, Version::HTTP_11);
		assert!(request.headers.is_empty());
		assert!(request.body.is_empty());
		assert!(request.extensions.is_empty());
	}

	#[rstest]
	fn test_builder_invalid_uri() {
		let result = Request::builder().uri("http://[::1").build();

		assert!(matches!(result, Err(Error::Http(_))));
	}

	#[rstest]
	fn test_builder_invalid_header() {
		let result = Request::builder().header("bad header", "x").build();

		assert!(matches!(result, Err(Error::Http(_))));
	}

	#[rstest]
	fn test_builder_content() {
		let request = Request::builder()
			.content(serde_json::json!({"a": 1}))
			.build()
			.unwrap();

		assert_eq!(
			request.content().unwrap(),
			Some(&serde_json::json!({"a": 1}))
		);
	}

	#[rstest]
	fn test_set_body() {
		let mut request = Request::builder().build().unwrap();
		request.set_body("abc");

		assert_eq!(request.body, Bytes::from_static(b"abc"));
	}
}
