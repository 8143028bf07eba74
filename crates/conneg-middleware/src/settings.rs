//! TOML configuration for the negotiators.
//!
//! ```toml
//! [negotiation]
//! media_types = ["application/json", "application/yaml", "application/msgpack"]
//!
//! [negotiation.json]
//! pretty = false
//! allow_empty = false
//! ```
//!
//! `media_types` is the priority order of the built registry. Every entry
//! must be a concrete type served by one of the built-in codecs.

use conneg_codecs::{JsonCodec, builtin_codec};
use conneg_core::codec::{Codec, Decoder, Encoder};
use conneg_core::exception::{Error, Result};
use conneg_core::negotiation::{CodecBinding, CodecRegistry, MediaType};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Options passed to [`JsonCodec`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSettings {
	pub pretty: bool,
	pub allow_empty: bool,
}

impl Default for JsonSettings {
	fn default() -> Self {
		let codec = JsonCodec::default();
		Self {
			pretty: codec.pretty,
			allow_empty: codec.allow_empty,
		}
	}
}

impl JsonSettings {
	fn codec(&self) -> JsonCodec {
		JsonCodec::new()
			.pretty(self.pretty)
			.allow_empty(self.allow_empty)
	}
}

/// The `[negotiation]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationSettings {
	pub media_types: Vec<MediaType>,
	pub json: JsonSettings,
}

impl Default for NegotiationSettings {
	fn default() -> Self {
		Self {
			media_types: vec![MediaType::json()],
			json: JsonSettings::default(),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
	#[serde(default)]
	negotiation: NegotiationSettings,
}

impl NegotiationSettings {
	/// Parse settings from a TOML document
	///
	/// A document without a `[negotiation]` table yields the defaults.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_middleware::NegotiationSettings;
	/// use conneg_core::negotiation::MediaType;
	///
	/// let settings = NegotiationSettings::from_toml_str(
	///     r#"
	///     [negotiation]
	///     media_types = ["application/yaml", "application/json"]
	///
	///     [negotiation.json]
	///     pretty = true
	///     "#,
	/// )
	/// .unwrap();
	///
	/// assert_eq!(settings.media_types, vec![MediaType::yaml(), MediaType::json()]);
	/// assert!(settings.json.pretty);
	/// assert!(!settings.json.allow_empty);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let file: SettingsFile = toml::from_str(source)
			.map_err(|e| Error::Configuration(format!("invalid negotiation settings: {e}")))?;
		Ok(file.negotiation)
	}

	/// Read and parse a TOML settings file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|e| {
			Error::Configuration(format!("cannot read {}: {e}", path.display()))
		})?;
		Self::from_toml_str(&source)
	}

	/// Build a registry binding each configured media type, in order, to the
	/// built-in codec that serves it
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] if the list is empty, contains a
	/// wildcard, or names a type no built-in codec serves.
	pub fn build_registry(&self) -> Result<CodecRegistry> {
		if self.media_types.is_empty() {
			return Err(Error::Configuration("no media types configured".into()));
		}

		let json = JsonCodec::new();
		let mut builder = CodecRegistry::builder();
		for media_type in &self.media_types {
			if media_type.is_wildcard() {
				return Err(Error::Configuration(format!(
					"wildcard media type {media_type} cannot be served"
				)));
			}

			builder = if declares(&json, media_type) {
				builder.bind(media_type.clone(), self.json.codec())
			} else {
				let codec = builtin_codec(media_type).ok_or_else(|| {
					Error::Configuration(format!("no built-in codec for {media_type}"))
				})?;
				let decoder: Arc<dyn Decoder> = codec.clone();
				let encoder: Arc<dyn Encoder> = codec;
				builder.binding(
					CodecBinding::new(media_type.clone())
						.with_decoder(decoder)
						.with_encoder(encoder),
				)
			};
		}
		Ok(builder.build())
	}
}

fn declares(codec: &impl Codec, media_type: &MediaType) -> bool {
	codec
		.media_types()
		.iter()
		.any(|declared| declared.matches(media_type))
}
