use bytes::Bytes;
use conneg_core::codec::{Codec, Decoder, Encoder};
use conneg_core::content::Content;
use conneg_core::exception::{CodecError, CodecResult};
use conneg_core::negotiation::MediaType;

const FORMAT: &str = "json";

/// JSON codec for `application/json`
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
	/// Whether to allow empty bodies (decodes to null)
	pub allow_empty: bool,
	/// Whether to indent encoded output
	pub pretty: bool,
}

impl JsonCodec {
	/// Create a new JsonCodec with default settings (compact, empty not
	/// allowed).
	///
	/// # Examples
	///
	/// ```
	/// use conneg_codecs::JsonCodec;
	///
	/// let codec = JsonCodec::new();
	/// assert!(!codec.allow_empty);
	/// assert!(!codec.pretty);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn allow_empty(mut self, allow: bool) -> Self {
		self.allow_empty = allow;
		self
	}

	/// Indent encoded output
	///
	/// # Examples
	///
	/// ```
	/// use conneg_codecs::JsonCodec;
	/// use conneg_core::codec::Encoder;
	/// use serde_json::json;
	///
	/// let bytes = JsonCodec::new().pretty(true).encode(&json!({"a": 1})).unwrap();
	/// assert_eq!(&bytes[..], b"{\n  \"a\": 1\n}");
	/// ```
	pub fn pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;
		self
	}
}

impl Decoder for JsonCodec {
	fn decode(&self, body: &[u8]) -> CodecResult<Content> {
		if body.is_empty() {
			return if self.allow_empty {
				Ok(Content::Null)
			} else {
				Err(CodecError::Empty)
			};
		}

		// serde_json already refuses NaN, Infinity and out-of-range numbers.
		serde_json::from_slice(body).map_err(|e| CodecError::malformed(FORMAT, e))
	}
}

impl Encoder for JsonCodec {
	fn encode(&self, content: &Content) -> CodecResult<Bytes> {
		let encoded = if self.pretty {
			serde_json::to_vec_pretty(content)
		} else {
			serde_json::to_vec(content)
		};
		encoded
			.map(Bytes::from)
			.map_err(|e| CodecError::unrepresentable(FORMAT, e))
	}
}

impl Codec for JsonCodec {
	fn media_types(&self) -> Vec<MediaType> {
		vec![MediaType::json()]
	}
}
