//! # conneg-core
//!
//! Building blocks for HTTP content negotiation.
//!
//! - [`negotiation::MediaType`]: `type/subtype; params` with `*` wildcards
//! - [`negotiation::AcceptHeader`]: ordered `Accept` lists
//! - [`codec`]: the [`Decoder`](codec::Decoder) / [`Encoder`](codec::Encoder) capabilities
//! - [`negotiation::CodecRegistry`]: ordered bindings with fallthrough decode/encode
//! - [`content`]: the structured [`Content`](content::Content) value and typed mapping
//! - [`exception`]: error taxonomy
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use conneg_core::content::Content;
//! use conneg_core::exception::{CodecError, CodecResult};
//! use conneg_core::negotiation::{CodecRegistry, MediaType};
//!
//! let decode = |body: &[u8]| -> CodecResult<Content> {
//!     serde_json::from_slice(body).map_err(|e| CodecError::malformed("json", e))
//! };
//! let encode = |content: &Content| -> CodecResult<Bytes> {
//!     serde_json::to_vec(content)
//!         .map(Bytes::from)
//!         .map_err(|e| CodecError::unrepresentable("json", e))
//! };
//!
//! let registry = CodecRegistry::builder()
//!     .decoder(MediaType::json(), decode)
//!     .encoder(MediaType::json(), encode)
//!     .build();
//!
//! let (_, content) = registry.decode(br#"{"x":1}"#, &MediaType::json()).unwrap();
//! let (media_type, body) = registry.encode(&content, &[MediaType::any()]).unwrap();
//! assert_eq!(media_type, MediaType::json());
//! assert_eq!(&body[..], br#"{"x":1}"#);
//! ```

pub mod codec;
pub mod content;
pub mod exception;
pub mod negotiation;

pub use exception::{Error, Result};
