#![forbid(unsafe_code)]

//! Command-line support for decoding row dumps.
//!
//! The `rowgraph` binary is a thin wrapper over this module so the decode
//! pipeline can be driven and tested without spawning a process.

/// Decoding CSV row dumps into vertex records.
///
/// Streams a dump through the emitter and writes each initialized vertex as
/// text or JSON lines.
pub mod decode_dump;
