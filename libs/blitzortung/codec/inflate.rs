//! LZW frame expansion
//!
//! # Format
//!
//! The producer runs a character-oriented LZW encoder and writes every output
//! code as a single code point, UTF-8 encoded on the wire:
//!
//! ```text
//! code point <= 0xFF   literal character
//! code point >= 0x100  dictionary entry (code - 256)
//! ```
//!
//! The dictionary is rebuilt for every frame and grows by exactly one entry
//! per decoded code point after the first. A code may reference the entry
//! that is about to be created by the current step (the classic `KwKwK`
//! case); it then expands to the previous phrase followed by that phrase's
//! first character.
//!
//! The encoder performs no integrity checks, so neither does the decoder:
//! malformed input produces garbage output, never an error.

/// Expand one compressed frame.
///
/// Returns an empty buffer for empty input. Never fails and never panics,
/// whatever the input bytes are.
pub fn inflate(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let (_, width) = decode_rune(data);

    // Raw bytes of the first code point seed both scratch buffers.
    let mut last_char: Vec<u8> = data[..width].to_vec();
    let mut prev: Vec<u8> = last_char.clone();

    let mut out = Vec::with_capacity(data.len() * 2);
    out.extend_from_slice(&prev);

    // Entry `i` holds the phrase for code `256 + i`.
    let mut dictionary: Vec<Vec<u8>> = Vec::with_capacity(data.len());

    let mut offset = width;
    while offset < data.len() {
        let (code, width) = decode_rune(&data[offset..]);
        let code = u32::from(code);

        let phrase = if code <= 0xFF {
            data[offset..offset + width].to_vec()
        } else if let Some(entry) = dictionary.get((code - 256) as usize) {
            entry.clone()
        } else {
            concat(&prev, &last_char)
        };
        offset += width;

        out.extend_from_slice(&phrase);

        let (lead, _) = decode_rune(&phrase);
        last_char = encode_rune(lead);
        dictionary.push(concat(&prev, &last_char));

        prev = phrase;
    }

    out
}

/// Decode the first code point of `bytes`.
///
/// Invalid or truncated sequences decode as U+FFFD with a width of one byte;
/// an empty slice yields U+FFFD with a width of zero.
fn decode_rune(bytes: &[u8]) -> (char, usize) {
    let prefix = &bytes[..bytes.len().min(4)];
    let valid = match std::str::from_utf8(prefix) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&prefix[..e.valid_up_to()]).unwrap_or_default(),
    };

    match valid.chars().next() {
        Some(c) => (c, c.len_utf8()),
        None => (char::REPLACEMENT_CHARACTER, usize::from(!bytes.is_empty())),
    }
}

fn encode_rune(c: char) -> Vec<u8> {
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf).as_bytes().to_vec()
}

fn concat(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut joined = Vec::with_capacity(a.len() + b.len());
    joined.extend_from_slice(a);
    joined.extend_from_slice(b);
    joined
}
