// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Streaming UTF-8 decoder.
//!
//! Bytes read from a terminal arrive in chunks whose boundaries are arbitrary, so a
//! multi-byte character can be split across two reads. [`Decoder`] keeps the partial
//! sequence between calls to [`Decoder::decode`] and only emits a [`char`] once all
//! of its bytes have arrived.
//!
//! # Malformed input
//!
//! Invalid input never stops decoding. Each maximal invalid subpart is replaced by a
//! single [`REPLACEMENT_CHARACTER`]:
//!
//! - A byte that can never start a sequence (`0x80..=0xC1`, `0xF5..=0xFF`) becomes
//!   one replacement character.
//! - A sequence that is interrupted by a byte outside the allowed continuation range
//!   becomes one replacement character, and the interrupting byte is then decoded as
//!   the start of a new sequence.
//! - Overlong encodings and surrogates are rejected at their second byte, which has a
//!   narrower legal range for the lead bytes `E0`, `ED`, `F0` and `F4`.
//!
//! Since the machine advances one byte at a time, any split of the same input yields
//! the same codepoints.

/// Substituted for malformed byte sequences.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecoderState {
    #[default]
    Ground,
    /// Inside a multi-byte sequence.
    Pending {
        codepoint: u32,
        remaining: u8,
        /// Legal range for the next continuation byte.
        lower: u8,
        upper: u8,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoder {
    state: DecoderState,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Decode a chunk. Any trailing partial sequence is retained for the next call.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<char> {
        let mut acc = Vec::with_capacity(bytes.len());
        self.decode_into(bytes, &mut acc);
        acc
    }

    pub fn decode_into(&mut self, bytes: &[u8], acc: &mut Vec<char>) {
        for &byte in bytes {
            self.advance(byte, acc);
        }
    }

    /// Returns `true` if a multi-byte sequence is waiting for more bytes.
    #[must_use]
    pub fn has_pending(&self) -> bool { matches!(self.state, DecoderState::Pending { .. }) }

    /// Abandons a trailing partial sequence (end of stream). Returns the replacement
    /// character if there was one.
    pub fn finish(&mut self) -> Option<char> {
        let pending = self.has_pending();
        self.state = DecoderState::Ground;
        pending.then_some(REPLACEMENT_CHARACTER)
    }

    fn advance(&mut self, byte: u8, acc: &mut Vec<char>) {
        match self.state {
            DecoderState::Ground => self.start(byte, acc),
            DecoderState::Pending {
                codepoint,
                remaining,
                lower,
                upper,
            } => {
                if !(lower..=upper).contains(&byte) {
                    tracing::trace!(message = "malformed utf-8 sequence", byte);
                    self.state = DecoderState::Ground;
                    acc.push(REPLACEMENT_CHARACTER);
                    self.start(byte, acc);
                    return;
                }

                let codepoint = (codepoint << 6) | u32::from(byte & 0x3F);
                if remaining == 1 {
                    self.state = DecoderState::Ground;
                    acc.push(char::from_u32(codepoint).unwrap_or(REPLACEMENT_CHARACTER));
                } else {
                    self.state = DecoderState::Pending {
                        codepoint,
                        remaining: remaining - 1,
                        lower: 0x80,
                        upper: 0xBF,
                    };
                }
            }
        }
    }

    fn start(&mut self, byte: u8, acc: &mut Vec<char>) {
        let (codepoint, remaining, lower, upper) = match byte {
            0x00..=0x7F => {
                acc.push(char::from(byte));
                return;
            }
            0xC2..=0xDF => (byte & 0x1F, 1, 0x80, 0xBF),
            0xE0 => (0x00, 2, 0xA0, 0xBF),
            0xE1..=0xEC | 0xEE..=0xEF => (byte & 0x0F, 2, 0x80, 0xBF),
            0xED => (0x0D, 2, 0x80, 0x9F),
            0xF0 => (0x00, 3, 0x90, 0xBF),
            0xF1..=0xF3 => (byte & 0x07, 3, 0x80, 0xBF),
            0xF4 => (0x04, 3, 0x80, 0x8F),
            _ => {
                tracing::trace!(message = "invalid utf-8 lead byte", byte);
                acc.push(REPLACEMENT_CHARACTER);
                return;
            }
        };
        self.state = DecoderState::Pending {
            codepoint: u32::from(codepoint),
            remaining,
            lower,
            upper,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn decode_all(bytes: &[u8]) -> Vec<char> { Decoder::new().decode(bytes) }

    fn decode_byte_by_byte(bytes: &[u8]) -> Vec<char> {
        let mut decoder = Decoder::new();
        let mut acc = vec![];
        for byte in bytes {
            decoder.decode_into(std::slice::from_ref(byte), &mut acc);
        }
        acc
    }

    #[test]
    fn test_ascii_and_multibyte() {
        let text = "héllo 世界 🦀 ok";
        assert_eq!(decode_all(text.as_bytes()), text.chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_partial_sequence_is_retained_across_chunks() {
        let crab = "🦀".as_bytes();
        let mut decoder = Decoder::new();
        assert_eq!(decoder.decode(&crab[..1]), Vec::<char>::new());
        assert!(decoder.has_pending());
        assert_eq!(decoder.decode(&crab[1..3]), Vec::<char>::new());
        assert_eq!(decoder.decode(&crab[3..]), vec!['🦀']);
        assert!(!decoder.has_pending());
    }

    #[test_case(b"plain ascii" ; "ascii")]
    #[test_case("日本語のテキスト".as_bytes() ; "three byte")]
    #[test_case("a🦀b😀c".as_bytes() ; "four byte")]
    #[test_case(b"\xffab\xc3" ; "invalid lead and truncated tail")]
    #[test_case(b"\xe2\x82x\xf0\x9f\x98" ; "interrupted sequences")]
    #[test_case(b"\xed\xa0\x80\xc0\xaf" ; "surrogate and overlong")]
    fn test_chunking_does_not_change_output(bytes: &[u8]) {
        let expected = decode_all(bytes);
        assert_eq!(decode_byte_by_byte(bytes), expected);
        for split in 0..=bytes.len() {
            let mut decoder = Decoder::new();
            let mut acc = decoder.decode(&bytes[..split]);
            acc.extend(decoder.decode(&bytes[split..]));
            assert_eq!(acc, expected, "split at {split}");
        }
    }

    #[test]
    fn test_invalid_lead_byte_is_replaced() {
        assert_eq!(decode_all(b"a\x80b\xffc"), vec!['a', REPLACEMENT_CHARACTER, 'b',
                                                    REPLACEMENT_CHARACTER, 'c']);
    }

    #[test]
    fn test_interrupting_byte_starts_a_new_sequence() {
        // `E2 82` is the start of `€`, cut off by `x`.
        assert_eq!(decode_all(b"\xe2\x82x"), vec![REPLACEMENT_CHARACTER, 'x']);
        // A new lead byte interrupting a sequence is decoded itself.
        assert_eq!(decode_all(b"\xe2\xc3\xa9"), vec![REPLACEMENT_CHARACTER, 'é']);
    }

    #[test]
    fn test_surrogates_are_rejected() {
        assert_eq!(decode_all(b"\xed\xa0\x80"), vec![REPLACEMENT_CHARACTER; 3]);
    }

    #[test]
    fn test_finish_reports_truncated_sequence() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.decode(b"ab\xe2\x82"), vec!['a', 'b']);
        assert_eq!(decoder.finish(), Some(REPLACEMENT_CHARACTER));
        assert_eq!(decoder.finish(), None);
    }
}
