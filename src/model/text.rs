//! Byte-string decoding shared by the value model and the text extractor.

/// Simple text decoding fallback when no encoding is available.
///
/// Tries UTF-16BE with a byte order mark, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with byte order mark
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
