//! Low-level primitives shared by the row model and the decoders.

/// Byte-level encoding and text helpers.
///
/// Fixed-width numeric codecs and UTF-8 handling for cell payloads.
pub mod bytes;
