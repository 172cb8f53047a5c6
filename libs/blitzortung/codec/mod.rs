//! Feed payload decoding
//!
//! The lightning feed compresses every frame with an LZW variant whose
//! dictionary codes are emitted as Unicode code points. [`inflate`] expands a
//! single frame back into its JSON text.

pub mod inflate;

pub use inflate::inflate;
