//! Compose descriptor handling
//!
//! Parsing, serialization, and the transformation passes applied to the
//! upstream reference compose file before the stack is started.

pub mod codec;
pub mod transform;

pub use codec::Descriptor;
