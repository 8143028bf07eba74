//! `application/x-www-form-urlencoded` codec.
//!
//! Form bodies are flat: decoding yields an object of strings, with a key
//! that repeats collecting its values into an array in body order. Only
//! content of that same shape can be encoded; numbers and booleans are
//! written in their JSON text form.

use bytes::Bytes;
use conneg_core::codec::{Codec, Decoder, Encoder};
use conneg_core::content::Content;
use conneg_core::exception::{CodecError, CodecResult};
use conneg_core::negotiation::MediaType;
use serde_json::Map;

const FORMAT: &str = "form";

/// URL-encoded form codec
///
/// # Examples
///
/// ```
/// use conneg_codecs::FormCodec;
/// use conneg_core::codec::Decoder;
/// use serde_json::json;
///
/// let value = FormCodec::new().decode(b"name=ann&tag=a&tag=b").unwrap();
/// assert_eq!(value, json!({"name": "ann", "tag": ["a", "b"]}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormCodec;

impl FormCodec {
	pub fn new() -> Self {
		Self
	}
}

impl Decoder for FormCodec {
	fn decode(&self, body: &[u8]) -> CodecResult<Content> {
		let pairs: Vec<(String, String)> =
			serde_urlencoded::from_bytes(body).map_err(|e| CodecError::malformed(FORMAT, e))?;

		let mut object = Map::new();
		for (key, value) in pairs {
			match object.get_mut(&key) {
				None => {
					object.insert(key, Content::String(value));
				}
				Some(Content::Array(values)) => values.push(Content::String(value)),
				Some(existing) => {
					let first = existing.take();
					*existing = Content::Array(vec![first, Content::String(value)]);
				}
			}
		}
		Ok(Content::Object(object))
	}
}

impl Encoder for FormCodec {
	fn encode(&self, content: &Content) -> CodecResult<Bytes> {
		let Content::Object(object) = content else {
			return Err(CodecError::unrepresentable(
				FORMAT,
				"only objects can be form encoded",
			));
		};

		let mut pairs = Vec::with_capacity(object.len());
		for (key, value) in object {
			match value {
				Content::Array(values) => {
					for value in values {
						pairs.push((key.as_str(), scalar(key, value)?));
					}
				}
				value => pairs.push((key.as_str(), scalar(key, value)?)),
			}
		}

		serde_urlencoded::to_string(pairs)
			.map(Bytes::from)
			.map_err(|e| CodecError::unrepresentable(FORMAT, e))
	}
}

fn scalar(key: &str, value: &Content) -> CodecResult<String> {
	match value {
		Content::String(s) => Ok(s.clone()),
		Content::Number(n) => Ok(n.to_string()),
		Content::Bool(b) => Ok(b.to_string()),
		Content::Null => Ok(String::new()),
		Content::Array(_) | Content::Object(_) => Err(CodecError::unrepresentable(
			FORMAT,
			format!("field {key:?} is nested"),
		)),
	}
}

impl Codec for FormCodec {
	fn media_types(&self) -> Vec<MediaType> {
		vec![MediaType::form_urlencoded()]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(b"".as_slice(), json!({}))]
	#[case(b"a=1".as_slice(), json!({"a": "1"}))]
	#[case(b"q=hello+world&lang=en%2Dus".as_slice(), json!({"q": "hello world", "lang": "en-us"}))]
	#[case(b"t=x&t=y&t=z".as_slice(), json!({"t": ["x", "y", "z"]}))]
	fn test_decode(#[case] body: &[u8], #[case] expected: Content) {
		assert_eq!(FormCodec::new().decode(body).unwrap(), expected);
	}

	#[rstest]
	fn test_encode_flat_object() {
		let bytes = FormCodec::new()
			.encode(&json!({"n": 2, "ok": true, "q": "a b", "t": ["x", "y"]}))
			.unwrap();

		assert_eq!(&bytes[..], b"n=2&ok=true&q=a+b&t=x&t=y");
	}

	#[rstest]
	#[case(json!([1, 2]))]
	#[case(json!("text"))]
	#[case(json!({"user": {"name": "ann"}}))]
	#[case(json!({"t": [[1]]}))]
	fn test_encode_unrepresentable(#[case] content: Content) {
		assert!(matches!(
			FormCodec::new().encode(&content),
			Err(CodecError::Unrepresentable { format: "form", .. })
		));
	}
}
