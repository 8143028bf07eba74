//! Built-in codecs for conneg.
//!
//! Each codec implements [`Codec`](conneg_core::codec::Codec) and can be
//! registered with
//! [`CodecRegistryBuilder::codec`](conneg_core::negotiation::CodecRegistryBuilder::codec),
//! which binds it under every media type it declares.
//!
//! ## Codecs
//!
//! - **JsonCodec**: `application/json`
//! - **YamlCodec**: `application/yaml`, `application/x-yaml`
//! - **MessagePackCodec**: `application/msgpack`, `application/x-msgpack`
//! - **FormCodec**: `application/x-www-form-urlencoded`
//!
//! ## Example
//!
//! ```rust
//! use conneg_codecs::{JsonCodec, YamlCodec};
//! use conneg_core::negotiation::{CodecRegistry, MediaType};
//! use serde_json::json;
//!
//! let registry = CodecRegistry::builder()
//!     .codec(JsonCodec::new())
//!     .codec(YamlCodec::new())
//!     .build();
//!
//! let (media_type, body) = registry
//!     .encode(&json!({"ok": true}), &[MediaType::yaml()])
//!     .unwrap();
//! assert_eq!(media_type, MediaType::yaml());
//! assert_eq!(&body[..], b"ok: true\n");
//! ```

pub mod form;
pub mod json;
pub mod msgpack;
pub mod yaml;

pub use form::FormCodec;
pub use json::JsonCodec;
pub use msgpack::MessagePackCodec;
pub use yaml::YamlCodec;

use conneg_core::codec::Codec;
use conneg_core::negotiation::MediaType;
use std::sync::Arc;

/// Finds the built-in codec declaring a media type that matches
/// `media_type`, or `None` if there is none.
///
/// # Examples
///
/// ```
/// use conneg_codecs::builtin_codec;
/// use conneg_core::negotiation::MediaType;
///
/// assert!(builtin_codec(&MediaType::parse("application/x-yaml").unwrap()).is_some());
/// assert!(builtin_codec(&MediaType::new("text", "csv")).is_none());
/// ```
pub fn builtin_codec(media_type: &MediaType) -> Option<Arc<dyn Codec>> {
	let codecs: [Arc<dyn Codec>; 4] = [
		Arc::new(JsonCodec::new()),
		Arc::new(YamlCodec::new()),
		Arc::new(MessagePackCodec::new()),
		Arc::new(FormCodec::new()),
	];
	codecs
		.into_iter()
		.find(|codec| codec.media_types().iter().any(|declared| declared.matches(media_type)))
}
