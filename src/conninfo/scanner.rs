/// Index of the first non-whitespace byte at or after `start`.
pub(super) fn skip_whitespace(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

/// End of a key token: stops at whitespace or `=`.
pub(super) fn scan_key(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx] != b'=' && !bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

/// End of an unquoted value: stops at whitespace. No escapes are recognized.
pub(super) fn scan_unquoted(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

/// Decode a single-quoted value whose opening quote sits at `open`.
///
/// Only `\'` is an escape; every other byte, backslashes included, is kept as is.
/// Returns the decoded value and the index just past the closing quote, or `None`
/// when the input ends before the closing quote.
pub(super) fn scan_quoted(input: &str, open: usize) -> Option<(String, usize)> {
    let bytes = input.as_bytes();
    let mut value = String::new();
    let mut segment_start = open + 1;
    let mut idx = open + 1;

    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' if bytes.get(idx + 1) == Some(&b'\'') => {
                value.push_str(&input[segment_start..idx]);
                value.push('\'');
                idx += 2;
                segment_start = idx;
            }
            b'\'' => {
                value.push_str(&input[segment_start..idx]);
                return Some((value, idx + 1));
            }
            _ => idx += 1,
        }
    }

    None
}
