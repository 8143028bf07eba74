//! Error types shared across conneg.
//!
//! Codec failures, negotiation failures and content-shape failures each have
//! their own type so middleware can tell them apart; [`Error`] wraps all of
//! them for the pipeline's `Result`.

use thiserror::Error;

use crate::negotiation::MediaType;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for a single codec invocation.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Failure of a single decoder or encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CodecError {
	/// The body was empty and the codec does not accept empty input.
	#[error("empty body")]
	Empty,

	/// Input bytes are not valid for the format.
	#[error("malformed {format} payload: {message}")]
	Malformed {
		/// Format name, e.g. `json`.
		format: &'static str,
		/// Underlying parser message.
		message: String,
	},

	/// The content cannot be represented in the format.
	#[error("content not representable as {format}: {message}")]
	Unrepresentable {
		/// Format name, e.g. `form`.
		format: &'static str,
		/// Reason.
		message: String,
	},
}

impl CodecError {
	pub fn malformed(format: &'static str, message: impl ToString) -> Self {
		Self::Malformed {
			format,
			message: message.to_string(),
		}
	}

	pub fn unrepresentable(format: &'static str, message: impl ToString) -> Self {
		Self::Unrepresentable {
			format,
			message: message.to_string(),
		}
	}
}

/// Failure to find (or successfully run) a codec for a media type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NegotiationError {
	/// No decoder matched, or every matching decoder rejected the payload.
	///
	/// `source` carries the last decoder error when at least one candidate
	/// was tried.
	#[error("no suitable decoder for {requested}")]
	NoSuitableDecoder {
		requested: MediaType,
		#[source]
		source: Option<CodecError>,
	},

	/// No encoder matched, or every matching encoder failed.
	#[error("no suitable encoder for [{}]", display_list(.accepted))]
	NoSuitableEncoder {
		accepted: Vec<MediaType>,
		#[source]
		source: Option<CodecError>,
	},

	/// A header value could not be parsed as a media type.
	#[error("invalid media type: {0:?}")]
	InvalidMediaType(String),
}

impl NegotiationError {
	/// Returns true if at least one codec matched and was tried.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::exception::{CodecError, NegotiationError};
	/// use conneg_core::negotiation::MediaType;
	///
	/// let none = NegotiationError::NoSuitableDecoder { requested: MediaType::json(), source: None };
	/// assert!(!none.has_candidates());
	///
	/// let tried = NegotiationError::NoSuitableDecoder {
	///     requested: MediaType::json(),
	///     source: Some(CodecError::Empty),
	/// };
	/// assert!(tried.has_candidates());
	/// ```
	pub fn has_candidates(&self) -> bool {
		match self {
			Self::NoSuitableDecoder { source, .. } | Self::NoSuitableEncoder { source, .. } => {
				source.is_some()
			}
			Self::InvalidMediaType(_) => false,
		}
	}

	/// The last codec error, if any candidate was tried.
	pub fn codec_error(&self) -> Option<&CodecError> {
		match self {
			Self::NoSuitableDecoder { source, .. } | Self::NoSuitableEncoder { source, .. } => {
				source.as_ref()
			}
			Self::InvalidMediaType(_) => None,
		}
	}
}

fn display_list(media_types: &[MediaType]) -> String {
	media_types
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

/// Failure to build a typed value from structured content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ContentError {
	/// The content decoded fine but its shape does not fit the target type.
	#[error("incompatible content for {expected}: {message}")]
	IncompatibleType {
		expected: &'static str,
		message: String,
	},

	/// Any other construction failure.
	#[error("{0}")]
	Custom(String),
}

/// Failure to read a value from per-message storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StorageError {
	/// A value exists under the key but has a different type.
	#[error("storage key {key:?} does not hold a value of type {expected}")]
	TypeMismatch {
		key: String,
		expected: &'static str,
	},
}

/// Pipeline error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	#[error(transparent)]
	Negotiation(#[from] NegotiationError),

	#[error(transparent)]
	Codec(#[from] CodecError),

	#[error(transparent)]
	Content(#[from] ContentError),

	#[error(transparent)]
	Storage(#[from] StorageError),

	/// Malformed HTTP message (bad header value, invalid URI).
	#[error("HTTP error: {0}")]
	Http(String),

	/// Invalid negotiation settings.
	#[error("configuration error: {0}")]
	Configuration(String),

	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code that best describes this error.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::exception::{Error, NegotiationError};
	/// use conneg_core::negotiation::MediaType;
	///
	/// let error = Error::from(NegotiationError::NoSuitableDecoder {
	///     requested: MediaType::json(),
	///     source: None,
	/// });
	/// assert_eq!(error.status_code(), 415);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Negotiation(NegotiationError::NoSuitableDecoder { source: None, .. }) => 415,
			Self::Negotiation(NegotiationError::NoSuitableDecoder { .. }) => 400,
			Self::Negotiation(NegotiationError::NoSuitableEncoder { source: None, .. }) => 406,
			Self::Negotiation(NegotiationError::NoSuitableEncoder { .. }) => 500,
			Self::Negotiation(NegotiationError::InvalidMediaType(_)) => 415,
			Self::Codec(CodecError::Unrepresentable { .. }) => 500,
			Self::Codec(_) => 400,
			Self::Content(ContentError::IncompatibleType { .. }) => 400,
			Self::Http(_) => 400,
			Self::Content(_) | Self::Storage(_) | Self::Configuration(_) | Self::Internal(_) => {
				500
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::from(NegotiationError::NoSuitableDecoder { requested: MediaType::json(), source: None }), 415)]
	#[case(Error::from(NegotiationError::NoSuitableDecoder { requested: MediaType::json(), source: Some(CodecError::Empty) }), 400)]
	#[case(Error::from(NegotiationError::NoSuitableEncoder { accepted: vec![], source: None }), 406)]
	#[case(Error::from(NegotiationError::NoSuitableEncoder { accepted: vec![], source: Some(CodecError::unrepresentable("form", "nested")) }), 500)]
	#[case(Error::from(ContentError::IncompatibleType { expected: "User", message: "missing field".into() }), 400)]
	#[case(Error::from(ContentError::Custom("boom".into())), 500)]
	#[case(Error::Configuration("bad".into()), 500)]
	fn test_status_code(#[case] error: Error, #[case] expected: u16) {
		assert_eq!(error.status_code(), expected);
	}

	#[test]
	fn test_encoder_error_lists_accepted_types() {
		let error = NegotiationError::NoSuitableEncoder {
			accepted: vec![MediaType::json(), MediaType::yaml()],
			source: None,
		};

		assert_eq!(
			error.to_string(),
			"no suitable encoder for [application/json, application/yaml]"
		);
	}

	#[test]
	fn test_source_chain() {
		use std::error::Error as _;

		let error = NegotiationError::NoSuitableDecoder {
			requested: MediaType::json(),
			source: Some(CodecError::malformed("json", "expected value")),
		};

		let source = error.source().map(ToString::to_string);
		assert_eq!(
			source.as_deref(),
			Some("malformed json payload: expected value")
		);
	}
}
