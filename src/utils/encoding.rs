/// Permissive decoding for the consumed flat files: undecodable byte
/// sequences are dropped, never fatal.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                if let Ok(prefix) = std::str::from_utf8(valid) {
                    out.push_str(prefix);
                }
                rest = match err.error_len() {
                    Some(skip) => &after[skip..],
                    // truncated sequence at end of input
                    None => &[],
                };
            }
        }
    }
    out
}

/// Strips the UTF-8 byte order mark some exported datasets carry.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_utf8_passthrough() {
        assert_eq!(decode_lossy("Amélie\tParis, France".as_bytes()), "Amélie\tParis, France");
    }

    #[test]
    fn test_decode_drops_invalid_sequences() {
        let bytes = b"Alpha \xFF\xFEBeta";
        assert_eq!(decode_lossy(bytes), "Alpha Beta");
    }

    #[test]
    fn test_decode_drops_truncated_tail() {
        // lone continuation start with no follow-up bytes
        let bytes = b"Gamma\xC3";
        assert_eq!(decode_lossy(bytes), "Gamma");
    }

    #[test]
    fn test_strip_bom() {
        let with_bom = b"\xEF\xBB\xBF{\"features\": []}";
        assert_eq!(strip_bom(with_bom), b"{\"features\": []}");
        assert_eq!(strip_bom(b"plain"), b"plain");
    }
}
