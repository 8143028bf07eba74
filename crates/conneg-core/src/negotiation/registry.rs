//! Ordered codec registry.
//!
//! A registry is a priority list of [`CodecBinding`]s, not a keyed map. When
//! decoding, every binding whose media type matches the requested type is
//! tried in registration order and the first success wins. When encoding,
//! the caller's accepted types are walked in preference order and, for each,
//! the matching encoders in registration order. A codec that fails does not
//! end negotiation: the next candidate gets a chance, and only when all of
//! them fail is the last error reported.
//!
//! ```
//! use conneg_core::content::Content;
//! use conneg_core::exception::{CodecError, CodecResult};
//! use conneg_core::negotiation::{CodecRegistry, MediaType};
//!
//! let strict = |_: &[u8]| -> CodecResult<Content> { Err(CodecError::Empty) };
//! let lenient = |_: &[u8]| -> CodecResult<Content> { Ok(Content::Null) };
//!
//! let registry = CodecRegistry::builder()
//!     .decoder(MediaType::json(), strict)
//!     .decoder(MediaType::parse("application/*").unwrap(), lenient)
//!     .build();
//!
//! let (used, content) = registry.decode(b"", &MediaType::json()).unwrap();
//! assert_eq!(used.essence(), "application/*");
//! assert_eq!(content, Content::Null);
//! ```

use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

use super::media_type::{MediaType, WILDCARD};
use crate::codec::{Codec, Decoder, Encoder};
use crate::content::Content;
use crate::exception::{CodecError, NegotiationError};

/// A media type bound to a decoder, an encoder, or both.
#[derive(Clone)]
pub struct CodecBinding {
	media_type: MediaType,
	decoder: Option<Arc<dyn Decoder>>,
	encoder: Option<Arc<dyn Encoder>>,
	match_parameters: bool,
}

impl CodecBinding {
	/// Creates a binding with neither a decoder nor an encoder.
	pub fn new(media_type: MediaType) -> Self {
		Self {
			media_type,
			decoder: None,
			encoder: None,
			match_parameters: false,
		}
	}

	/// Binds both halves of `codec`.
	pub fn for_codec<C: Codec + 'static>(media_type: MediaType, codec: C) -> Self {
		let codec = Arc::new(codec);
		let decoder: Arc<dyn Decoder> = codec.clone();
		let encoder: Arc<dyn Encoder> = codec;
		Self::new(media_type)
			.with_decoder(decoder)
			.with_encoder(encoder)
	}

	pub fn with_decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
		self.decoder = Some(decoder);
		self
	}

	pub fn with_encoder(mut self, encoder: Arc<dyn Encoder>) -> Self {
		self.encoder = Some(encoder);
		self
	}

	/// Require parameters declared on this binding's media type (such as
	/// `charset`) to be present with the same value on the requested type.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::{CodecBinding, MediaType};
	///
	/// let binding = CodecBinding::new(MediaType::json().with_parameter("charset", "utf-8"));
	/// assert!(binding.matches(&MediaType::json()));
	///
	/// let strict = binding.match_parameters(true);
	/// assert!(!strict.matches(&MediaType::json()));
	/// assert!(strict.matches(&MediaType::json().with_parameter("charset", "UTF-8")));
	/// ```
	pub fn match_parameters(mut self, enabled: bool) -> Self {
		self.match_parameters = enabled;
		self
	}

	pub fn media_type(&self) -> &MediaType {
		&self.media_type
	}

	pub fn decoder(&self) -> Option<&Arc<dyn Decoder>> {
		self.decoder.as_ref()
	}

	pub fn encoder(&self) -> Option<&Arc<dyn Encoder>> {
		self.encoder.as_ref()
	}

	/// Returns true if this binding applies to `requested`.
	pub fn matches(&self, requested: &MediaType) -> bool {
		if self.match_parameters {
			self.media_type.matches_with_parameters(requested)
		} else {
			self.media_type.matches(requested)
		}
	}
}

impl fmt::Debug for CodecBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CodecBinding")
			.field("media_type", &self.media_type.to_string())
			.field("decoder", &self.decoder.is_some())
			.field("encoder", &self.encoder.is_some())
			.field("match_parameters", &self.match_parameters)
			.finish()
	}
}

/// Immutable, ordered collection of codec bindings.
///
/// Built once with [`CodecRegistry::builder`] and shared read-only (usually
/// behind an `Arc`) by any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
	bindings: Vec<CodecBinding>,
}

impl CodecRegistry {
	pub fn builder() -> CodecRegistryBuilder {
		CodecRegistryBuilder::default()
	}

	/// Builds a registry from `(media type, decoder, encoder)` triples, in
	/// order.
	pub fn from_codecs<I>(codecs: I) -> Self
	where
		I: IntoIterator<Item = (MediaType, Arc<dyn Decoder>, Arc<dyn Encoder>)>,
	{
		codecs
			.into_iter()
			.map(|(media_type, decoder, encoder)| {
				CodecBinding::new(media_type)
					.with_decoder(decoder)
					.with_encoder(encoder)
			})
			.collect()
	}

	pub fn bindings(&self) -> &[CodecBinding] {
		&self.bindings
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	/// Distinct binding media types in registration order.
	///
	/// This is what a server falls back to when the client sent no `Accept`
	/// list, and what a client advertises in its own `Accept` header.
	pub fn media_types(&self) -> Vec<MediaType> {
		let mut media_types: Vec<MediaType> = Vec::with_capacity(self.bindings.len());
		for binding in &self.bindings {
			if !media_types.contains(&binding.media_type) {
				media_types.push(binding.media_type.clone());
			}
		}
		media_types
	}

	/// Decoders whose binding matches `requested`, in registration order.
	pub fn decoders_for(&self, requested: &MediaType) -> Vec<(&MediaType, &Arc<dyn Decoder>)> {
		self.bindings
			.iter()
			.filter(|binding| binding.matches(requested))
			.filter_map(|binding| {
				binding
					.decoder
					.as_ref()
					.map(|decoder| (&binding.media_type, decoder))
			})
			.collect()
	}

	/// Encoders whose binding matches `accepted`, in registration order.
	pub fn encoders_for(&self, accepted: &MediaType) -> Vec<(&MediaType, &Arc<dyn Encoder>)> {
		self.bindings
			.iter()
			.filter(|binding| binding.matches(accepted))
			.filter_map(|binding| {
				binding
					.encoder
					.as_ref()
					.map(|encoder| (&binding.media_type, encoder))
			})
			.collect()
	}

	/// Decodes `body` with the first matching decoder that succeeds.
	///
	/// Returns the media type of the binding that was used with the value.
	///
	/// # Errors
	///
	/// [`NegotiationError::NoSuitableDecoder`] with `source: None` if nothing
	/// matches `requested`, or with the last decoder's error if every
	/// candidate failed.
	pub fn decode(
		&self,
		body: &[u8],
		requested: &MediaType,
	) -> Result<(MediaType, Content), NegotiationError> {
		let mut last_error: Option<CodecError> = None;

		for (media_type, decoder) in self.decoders_for(requested) {
			match decoder.decode(body) {
				Ok(content) => {
					tracing::debug!(
						requested = %requested,
						media_type = %media_type,
						bytes = body.len(),
						"decoded body"
					);
					return Ok((media_type.clone(), content));
				}
				Err(error) => {
					tracing::trace!(
						media_type = %media_type,
						error = %error,
						"decoder rejected body, trying next candidate"
					);
					last_error = Some(error);
				}
			}
		}

		Err(NegotiationError::NoSuitableDecoder {
			requested: requested.clone(),
			source: last_error,
		})
	}

	/// Encodes `content` for the first accepted type that some encoder
	/// handles successfully.
	///
	/// `accepted` is a preference list, most preferred first. For each entry
	/// the matching encoders are tried in registration order.
	///
	/// # Errors
	///
	/// [`NegotiationError::NoSuitableEncoder`] with `source: None` if no
	/// encoder matches any accepted type, or with the last encoder's error if
	/// every candidate failed. A candidate for which no concrete content type
	/// can be named (a `*/*` binding against `Accept: */*`) is skipped
	/// without counting as a failure.
	pub fn encode(
		&self,
		content: &Content,
		accepted: &[MediaType],
	) -> Result<(MediaType, Bytes), NegotiationError> {
		let mut last_error: Option<CodecError> = None;

		for accepted_type in accepted {
			for (media_type, encoder) in self.encoders_for(accepted_type) {
				let Some(used) = reported_media_type(media_type, accepted_type) else {
					tracing::trace!(
						media_type = %media_type,
						accepted = %accepted_type,
						"no concrete content type for candidate, skipping"
					);
					continue;
				};
				match encoder.encode(content) {
					Ok(body) => {
						tracing::debug!(
							accepted = %accepted_type,
							media_type = %used,
							bytes = body.len(),
							"encoded content"
						);
						return Ok((used, body));
					}
					Err(error) => {
						tracing::trace!(
							media_type = %media_type,
							error = %error,
							"encoder failed, trying next candidate"
						);
						last_error = Some(error);
					}
				}
			}
		}

		Err(NegotiationError::NoSuitableEncoder {
			accepted: accepted.to_vec(),
			source: last_error,
		})
	}

	/// Encodes `content` against this registry's own media types.
	pub fn encode_preferred(&self, content: &Content) -> Result<(MediaType, Bytes), NegotiationError> {
		self.encode(content, &self.media_types())
	}
}

// The type sent as Content-Type, each half taken from whichever side is
// concrete. `None` if a wildcard half remains.
fn reported_media_type(binding: &MediaType, accepted: &MediaType) -> Option<MediaType> {
	if !binding.is_wildcard() {
		return Some(binding.clone());
	}
	if !accepted.is_wildcard() {
		return Some(accepted.clone());
	}

	let type_ = concrete_half(binding.type_(), accepted.type_())?;
	let subtype = concrete_half(binding.subtype(), accepted.subtype())?;
	Some(
		binding
			.parameters()
			.iter()
			.fold(MediaType::new(type_, subtype), |media_type, (key, value)| {
				media_type.with_parameter(key, value.clone())
			}),
	)
}

fn concrete_half<'a>(binding: &'a str, accepted: &'a str) -> Option<&'a str> {
	[binding, accepted].into_iter().find(|half| *half != WILDCARD)
}

impl FromIterator<CodecBinding> for CodecRegistry {
	fn from_iter<I: IntoIterator<Item = CodecBinding>>(iter: I) -> Self {
		Self {
			bindings: iter.into_iter().collect(),
		}
	}
}

/// Builder for [`CodecRegistry`]. Registration order is priority order.
#[derive(Debug, Default)]
pub struct CodecRegistryBuilder {
	bindings: Vec<CodecBinding>,
}

impl CodecRegistryBuilder {
	/// Registers `codec` under each media type it declares.
	pub fn codec<C: Codec + 'static>(mut self, codec: C) -> Self {
		let codec = Arc::new(codec);
		for media_type in codec.media_types() {
			let decoder: Arc<dyn Decoder> = codec.clone();
			let encoder: Arc<dyn Encoder> = codec.clone();
			self.bindings.push(
				CodecBinding::new(media_type)
					.with_decoder(decoder)
					.with_encoder(encoder),
			);
		}
		self
	}

	/// Registers `codec` under an explicit media type.
	pub fn bind<C: Codec + 'static>(mut self, media_type: MediaType, codec: C) -> Self {
		self.bindings.push(CodecBinding::for_codec(media_type, codec));
		self
	}

	pub fn decoder<D: Decoder + 'static>(mut self, media_type: MediaType, decoder: D) -> Self {
		self.bindings
			.push(CodecBinding::new(media_type).with_decoder(Arc::new(decoder)));
		self
	}

	pub fn encoder<E: Encoder + 'static>(mut self, media_type: MediaType, encoder: E) -> Self {
		self.bindings
			.push(CodecBinding::new(media_type).with_encoder(Arc::new(encoder)));
		self
	}

	pub fn binding(mut self, binding: CodecBinding) -> Self {
		self.bindings.push(binding);
		self
	}

	pub fn build(self) -> CodecRegistry {
		CodecRegistry {
			bindings: self.bindings,
		}
	}
}
