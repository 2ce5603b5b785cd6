// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Converts codepoints into the bytes written to the terminal. The output encoding is
/// always UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder;

impl Encoder {
    #[must_use]
    pub fn encode(self, codepoints: &[char]) -> Vec<u8> {
        let mut acc = Vec::with_capacity(codepoints.len());
        self.encode_into(codepoints, &mut acc);
        acc
    }

    pub fn encode_into(self, codepoints: &[char], acc: &mut Vec<u8>) {
        let mut scratch = [0_u8; 4];
        for codepoint in codepoints {
            acc.extend_from_slice(codepoint.encode_utf8(&mut scratch).as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Decoder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_matches_str_bytes() {
        let text = "ab é 世 🦀";
        let codepoints = text.chars().collect::<Vec<_>>();
        assert_eq!(Encoder.encode(&codepoints), text.as_bytes());
    }

    #[test]
    fn test_decoder_reads_encoder_output() {
        let codepoints = vec!['x', '\u{1b}', 'ß', '😀'];
        let bytes = Encoder.encode(&codepoints);
        assert_eq!(Decoder::new().decode(&bytes), codepoints);
    }
}
