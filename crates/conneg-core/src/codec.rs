//! Decoder and encoder capability traits.

use bytes::Bytes;

use crate::content::Content;
use crate::exception::CodecResult;
use crate::negotiation::MediaType;

/// Turns raw bytes into [`Content`].
pub trait Decoder: Send + Sync {
	/// Decodes a complete message body.
	///
	/// # Errors
	///
	/// Returns a [`CodecError`](crate::exception::CodecError) if the bytes are
	/// not valid for this format.
	fn decode(&self, body: &[u8]) -> CodecResult<Content>;
}

/// Turns [`Content`] into raw bytes.
pub trait Encoder: Send + Sync {
	/// Encodes content into a message body.
	///
	/// # Errors
	///
	/// Returns a [`CodecError`](crate::exception::CodecError) if the content
	/// cannot be represented in this format.
	fn encode(&self, content: &Content) -> CodecResult<Bytes>;
}

/// A decoder and encoder for one format, with the media types it handles.
///
/// The first media type is the canonical one; the rest are aliases
/// (`application/x-yaml` next to `application/yaml`).
pub trait Codec: Decoder + Encoder {
	fn media_types(&self) -> Vec<MediaType>;
}

impl<F> Decoder for F
where
	F: Fn(&[u8]) -> CodecResult<Content> + Send + Sync,
{
	fn decode(&self, body: &[u8]) -> CodecResult<Content> {
		self(body)
	}
}

impl<F> Encoder for F
where
	F: Fn(&Content) -> CodecResult<Bytes> + Send + Sync,
{
	fn encode(&self, content: &Content) -> CodecResult<Bytes> {
		self(content)
	}
}
