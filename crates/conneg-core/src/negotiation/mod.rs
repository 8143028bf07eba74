//! Media types, Accept lists and the codec registry.

pub mod accept;
pub mod media_type;
pub mod registry;

pub use accept::AcceptHeader;
pub use media_type::{MediaType, WILDCARD};
pub use registry::{CodecBinding, CodecRegistry, CodecRegistryBuilder};
