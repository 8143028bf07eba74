//! Negotiation accessors: content slot, mapped objects and the
//! Content-Type / Accept / Content-Length headers.

use conneg_core::content::{Content, ContentMappable, IntoContent};
use conneg_core::exception::{NegotiationError, Result, StorageError};
use conneg_core::negotiation::MediaType;

use super::Request;
use crate::{CONTENT_KEY, header};

impl Request {
	/// Decoded body, if a negotiator stored one
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

	/// Remove and return the content slot
	pub fn take_content(&mut self) -> std::result::Result<Option<Content>, StorageError> {
		self.extensions.remove_keyed::<Content>(CONTENT_KEY)
	}

	/// Attach content in builder style
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Request;
	/// use serde_json::json;
	///
	/// let request = Request::builder()
	///     .build()
	///     .unwrap()
	///     .with_content(json!({"q": "rust"}));
	///
	/// assert_eq!(request.content().unwrap(), Some(&json!({"q": "rust"})));
	/// ```
	pub fn with_content(mut self, content: Content) -> Self {
		self.set_content(content);
		self
	}

	/// Attach the content form of `value`
	pub fn with_representable(self, value: &impl IntoContent) -> Self {
		self.with_content(value.to_content())
	}

	/// Object stored by the content mapper for `T`
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::content::{Content, ContentMappable, FromContent};
	/// use conneg_core::exception::ContentError;
	/// use conneg_http::Request;
	///
	/// struct Query(String);
	///
	/// impl FromContent for Query {
	///     fn from_content(content: &Content) -> Result<Self, ContentError> {
	///         Ok(Query(content.to_string()))
	///     }
	/// }
	/// impl ContentMappable for Query {}
	///
	/// let mut request = Request::builder().build().unwrap();
	/// assert!(request.mapped::<Query>().unwrap().is_none());
	///
	/// request.insert_mapped(Query("x".into()));
	/// assert_eq!(request.mapped::<Query>().unwrap().map(|q| q.0.as_str()), Some("x"));
	/// ```
	pub fn mapped<T: ContentMappable>(&self) -> std::result::Result<Option<&T>, StorageError> {
		self.extensions.get_keyed::<T>(T::key())
	}

	pub fn insert_mapped<T: ContentMappable>(&mut self, value: T) {
		self.extensions.insert_keyed(T::key(), value);
	}

	/// Parsed `Content-Type` header
	///
	/// # Errors
	///
	/// Returns [`NegotiationError::InvalidMediaType`] if the header is present
	/// but cannot be parsed.
	pub fn content_type(&self) -> std::result::Result<Option<MediaType>, NegotiationError> {
		header::content_type(&self.headers)
	}

	pub fn set_content_type(&mut self, media_type: &MediaType) -> Result<()> {
		header::set_content_type(&mut self.headers, media_type)
	}

	/// Media types from `Accept`, most preferred first
	pub fn accept(&self) -> Vec<MediaType> {
		header::accept(&self.headers)
	}

	/// Replace `Accept`; an empty list removes the header
	pub fn set_accept(&mut self, media_types: &[MediaType]) -> Result<()> {
		header::set_accept(&mut self.headers, media_types)
	}

	pub fn set_content_length(&mut self, length: usize) {
		header::set_content_length(&mut self.headers, length);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use conneg_core::content::FromContent;
	use conneg_core::exception::ContentError;
	use rstest::rstest;
	use serde_json::json;

	struct Tagged;

	impl FromContent for Tagged {
		fn from_content(_content: &Content) -> std::result::Result<Self, ContentError> {
			Ok(Tagged)
		}
	}

	impl ContentMappable for Tagged {}

	fn request() -> Request {
		Request::builder().build().unwrap()
	}

	#[rstest]
	fn test_content_round_trip() {
		let mut request = request();
		assert_eq!(request.content().unwrap(), None);

		request.set_content(json!([1, 2]));
		assert_eq!(request.content().unwrap(), Some(&json!([1, 2])));

		assert_eq!(request.take_content().unwrap(), Some(json!([1, 2])));
		assert_eq!(request.content().unwrap(), None);
	}

	#[rstest]
	fn test_content_type_mismatch() {
		let mut request = request();
		request.extensions.insert_keyed(CONTENT_KEY, 5u8);

		assert!(matches!(
			request.content(),
			Err(StorageError::TypeMismatch { .. })
		));
	}

	#[rstest]
	fn test_mapped_wrong_type_under_key() {
		let mut request = request();
		request.extensions.insert_keyed(Tagged::key(), "not tagged");

		assert!(request.mapped::<Tagged>().is_err());
	}

	#[rstest]
	fn test_content_type_accessors() {
		let mut request = request();
		assert_eq!(request.content_type(), Ok(None));

		request.set_content_type(&MediaType::yaml()).unwrap();
		assert_eq!(request.content_type(), Ok(Some(MediaType::yaml())));
		assert_eq!(request.headers.get("content-type").unwrap(), "application/yaml");
	}

	#[rstest]
	fn test_accept_accessors() {
		let mut request = request();
		assert!(request.accept().is_empty());

		request
			.set_accept(&[MediaType::msgpack(), MediaType::json()])
			.unwrap();

		assert_eq!(
			request.headers.get("accept").unwrap(),
			"application/msgpack, application/json"
		);
		assert_eq!(request.accept(), vec![MediaType::msgpack(), MediaType::json()]);
	}
}
