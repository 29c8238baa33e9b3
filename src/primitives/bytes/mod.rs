#![forbid(unsafe_code)]
//! Encoding and text utilities for raw cell payloads.

pub mod be {
    //! Fixed-width big-endian numeric codecs.

    const F64_LEN: usize = core::mem::size_of::<f64>();

    /// Encodes an f64 as 8 big-endian IEEE-754 bytes.
    pub fn encode_f64(v: f64) -> [u8; F64_LEN] {
        v.to_be_bytes()
    }

    /// Decodes an f64 from exactly 8 big-endian IEEE-754 bytes.
    ///
    /// Returns `None` when `src` is not exactly 8 bytes long; trailing or
    /// missing bytes are never tolerated.
    pub fn decode_f64(src: &[u8]) -> Option<f64> {
        let bytes: [u8; F64_LEN] = src.try_into().ok()?;
        Some(f64::from_be_bytes(bytes))
    }
}

pub mod text {
    //! UTF-8 helpers for keys and qualifiers.

    /// Decodes bytes as UTF-8 text, rejecting invalid sequences.
    pub fn decode_utf8(src: &[u8]) -> Option<&str> {
        core::str::from_utf8(src).ok()
    }

    /// Renders bytes for diagnostics: valid UTF-8 verbatim, otherwise with
    /// non-printable and non-ASCII bytes escaped.
    pub fn display_lossy(src: &[u8]) -> String {
        match core::str::from_utf8(src) {
            Ok(s) => s.to_owned(),
            Err(_) => src.escape_ascii().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{be, text};
    use proptest::prelude::*;

    #[test]
    fn f64_decode_known_bytes() {
        let bytes = [0x3F, 0xE0, 0xF5, 0xC2, 0x8F, 0x5C, 0x28, 0xF6];
        assert_eq!(be::decode_f64(&bytes), Some(0.53));
        assert_eq!(be::encode_f64(0.53), bytes);
    }

    #[test]
    fn f64_decode_handles_zero_and_negative() {
        assert_eq!(be::decode_f64(&be::encode_f64(0.0)), Some(0.0));
        assert_eq!(be::decode_f64(&be::encode_f64(-0.0)).map(f64::to_bits), Some((-0.0f64).to_bits()));
        assert_eq!(be::decode_f64(&be::encode_f64(-12.5)), Some(-12.5));
    }

    #[test]
    fn f64_decode_rejects_wrong_length() {
        assert_eq!(be::decode_f64(&[]), None);
        assert_eq!(be::decode_f64(&[0u8; 7]), None);
        assert_eq!(be::decode_f64(&[0u8; 9]), None);
    }

    #[test]
    fn display_lossy_escapes_invalid_utf8() {
        assert_eq!(text::display_lossy(b"http://a.com"), "http://a.com");
        assert_eq!(text::display_lossy(&[b'a', 0xFF, b'b']), "a\\xffb");
        assert!(text::decode_utf8(&[0xC3]).is_none());
        assert_eq!(text::decode_utf8("héllo".as_bytes()), Some("héllo"));
    }

    proptest! {
        #[test]
        fn f64_roundtrip_finite_prop(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
            let encoded = be::encode_f64(v);
            prop_assert_eq!(be::decode_f64(&encoded), Some(v));
        }

        #[test]
        fn f64_big_endian_matches_sign_bit_prop(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
            let encoded = be::encode_f64(v);
            prop_assert_eq!(encoded[0] & 0x80 != 0, v.is_sign_negative());
        }
    }
}
