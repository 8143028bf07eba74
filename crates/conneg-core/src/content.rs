//! Structured content and conversions to and from typed values.
//!
//! [`Content`] is the format-agnostic tree that codecs produce and consume.
//! Negotiation never looks inside it; the traits here are how handlers turn
//! it into their own types and back.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::exception::ContentError;

/// The negotiated, in-memory representation of a message body.
pub type Content = serde_json::Value;

/// Types that can be constructed from [`Content`].
pub trait FromContent: Sized {
	/// Builds `Self` from decoded content.
	///
	/// # Errors
	///
	/// Returns [`ContentError::IncompatibleType`] when the content has the
	/// wrong shape, or another [`ContentError`] for any other failure.
	fn from_content(content: &Content) -> Result<Self, ContentError>;
}

/// A [`FromContent`] type that can be stored on a request by the mapper
/// middleware.
///
/// The storage key defaults to the fully-qualified type name.
///
/// # Examples
///
/// ```
/// use conneg_core::content::{Content, ContentMappable, FromContent, from_content_deserialize};
/// use conneg_core::exception::ContentError;
///
/// #[derive(serde::Deserialize)]
/// struct Login {
///     username: String,
/// }
///
/// impl FromContent for Login {
///     fn from_content(content: &Content) -> Result<Self, ContentError> {
///         from_content_deserialize(content)
///     }
/// }
///
/// impl ContentMappable for Login {}
///
/// assert!(Login::key().ends_with("Login"));
/// ```
pub trait ContentMappable: FromContent + Send + Sync + 'static {
	fn key() -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// Types that can be turned into [`Content`].
pub trait IntoContent {
	fn to_content(&self) -> Content;
}

impl IntoContent for Content {
	fn to_content(&self) -> Content {
		self.clone()
	}
}

/// Collects an iterator of representable values into an array.
///
/// # Examples
///
/// ```
/// use conneg_core::content::{Content, IntoContent, collect_content};
///
/// struct Tag(&'static str);
///
/// impl IntoContent for Tag {
///     fn to_content(&self) -> Content {
///         Content::from(self.0)
///     }
/// }
///
/// let tags = [Tag("rust"), Tag("http")];
/// assert_eq!(collect_content(&tags), serde_json::json!(["rust", "http"]));
/// ```
pub fn collect_content<'a, T, I>(items: I) -> Content
where
	T: IntoContent + 'a,
	I: IntoIterator<Item = &'a T>,
{
	Content::Array(items.into_iter().map(IntoContent::to_content).collect())
}

/// Deserializes content into `T`, reporting shape mismatches as
/// [`ContentError::IncompatibleType`].
pub fn from_content_deserialize<T: DeserializeOwned>(content: &Content) -> Result<T, ContentError> {
	T::deserialize(content).map_err(|e| ContentError::IncompatibleType {
		expected: std::any::type_name::<T>(),
		message: e.to_string(),
	})
}

/// Serializes `value` into content.
///
/// # Errors
///
/// Fails with [`ContentError::Custom`] if `value`'s `Serialize` impl fails
/// (for example a map with non-string keys).
pub fn to_content_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Content, ContentError> {
	serde_json::to_value(value).map_err(|e| ContentError::Custom(e.to_string()))
}
