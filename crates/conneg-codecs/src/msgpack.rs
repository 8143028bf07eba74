//! MessagePack codec for binary message format.

use bytes::Bytes;
use conneg_core::codec::{Codec, Decoder, Encoder};
use conneg_core::content::Content;
use conneg_core::exception::{CodecError, CodecResult};
use conneg_core::negotiation::MediaType;

const FORMAT: &str = "msgpack";

/// Codec for MessagePack binary format.
///
/// # Supported Content Types
///
/// - `application/msgpack`
/// - `application/x-msgpack`
///
/// # Examples
///
/// ```
/// use conneg_codecs::MessagePackCodec;
/// use conneg_core::codec::Decoder;
///
/// // {"key": "value"}
/// let body = [0x81, 0xa3, 0x6b, 0x65, 0x79, 0xa5, 0x76, 0x61, 0x6c, 0x75, 0x65];
///
/// let value = MessagePackCodec::new().decode(&body).unwrap();
/// assert_eq!(value["key"], "value");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessagePackCodec;

impl MessagePackCodec {
	pub fn new() -> Self {
		Self
	}
}

impl Decoder for MessagePackCodec {
	fn decode(&self, body: &[u8]) -> CodecResult<Content> {
		if body.is_empty() {
			return Err(CodecError::Empty);
		}
		rmp_serde::from_slice(body).map_err(|e| CodecError::malformed(FORMAT, e))
	}
}

impl Encoder for MessagePackCodec {
	fn encode(&self, content: &Content) -> CodecResult<Bytes> {
		rmp_serde::to_vec_named(content)
			.map(Bytes::from)
			.map_err(|e| CodecError::unrepresentable(FORMAT, e))
	}
}

impl Codec for MessagePackCodec {
	fn media_types(&self) -> Vec<MediaType> {
		vec![MediaType::msgpack(), MediaType::new("application", "x-msgpack")]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_encode_small_map() {
		let bytes = MessagePackCodec::new().encode(&json!({"key": "value"})).unwrap();

		assert_eq!(
			&bytes[..],
			&[0x81, 0xa3, 0x6b, 0x65, 0x79, 0xa5, 0x76, 0x61, 0x6c, 0x75, 0x65]
		);
	}

	#[rstest]
	fn test_decode_array() {
		// [1, 2, 3]
		let value = MessagePackCodec::new().decode(&[0x93, 0x01, 0x02, 0x03]).unwrap();

		assert_eq!(value, json!([1, 2, 3]));
	}

	#[rstest]
	#[case(&[0xc1][..])]
	#[case(&[0x93, 0x01][..])]
	fn test_decode_malformed(#[case] body: &[u8]) {
		assert!(matches!(
			MessagePackCodec::new().decode(body),
			Err(CodecError::Malformed { format: "msgpack", .. })
		));
	}

	#[rstest]
	fn test_decode_empty() {
		assert_eq!(MessagePackCodec::new().decode(b""), Err(CodecError::Empty));
	}
}
