//! YAML codec.
//!
//! Mappings with non-string keys cannot be represented as [`Content`] and
//! fail to decode.

use bytes::Bytes;
use conneg_core::codec::{Codec, Decoder, Encoder};
use conneg_core::content::Content;
use conneg_core::exception::{CodecError, CodecResult};
use conneg_core::negotiation::MediaType;

const FORMAT: &str = "yaml";

/// YAML codec for `application/yaml` and `application/x-yaml`
///
/// # Examples
///
/// ```
/// use conneg_codecs::YamlCodec;
/// use conneg_core::codec::Decoder;
///
/// let value = YamlCodec::new().decode(b"name: John\nage: 30\n").unwrap();
/// assert_eq!(value["name"], "John");
/// assert_eq!(value["age"], 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlCodec {
	/// Whether to allow empty bodies (decodes to null)
	pub allow_empty: bool,
}

impl YamlCodec {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn allow_empty(mut self, allow: bool) -> Self {
		self.allow_empty = allow;
		self
	}
}

impl Decoder for YamlCodec {
	fn decode(&self, body: &[u8]) -> CodecResult<Content> {
		if body.iter().all(u8::is_ascii_whitespace) {
			return if self.allow_empty {
				Ok(Content::Null)
			} else {
				Err(CodecError::Empty)
			};
		}
		serde_yaml::from_slice(body).map_err(|e| CodecError::malformed(FORMAT, e))
	}
}

impl Encoder for YamlCodec {
	fn encode(&self, content: &Content) -> CodecResult<Bytes> {
		serde_yaml::to_string(content)
			.map(Bytes::from)
			.map_err(|e| CodecError::unrepresentable(FORMAT, e))
	}
}

impl Codec for YamlCodec {
	fn media_types(&self) -> Vec<MediaType> {
		vec![MediaType::yaml(), MediaType::new("application", "x-yaml")]
	}
}
