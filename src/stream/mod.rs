//! Byte-stream collaborators of the protocol engine.
//!
//! Neither knows anything about tags. [`Compression`] wraps the whole byte
//! source or sink once, outside the tag protocol. [`Encoding`] turns the
//! text of names and string payloads into bytes and back.
mod compression;
mod encoding;

pub use compression::{CompressedWriter, Compression};
pub use encoding::Encoding;
