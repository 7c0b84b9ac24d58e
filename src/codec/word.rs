//! 32-byte word helpers shared by the encoder and decoder

use std::fmt::Write as _;

use super::CodecError;

/// Size of an ABI word in bytes
pub const WORD: usize = 32;

/// Round `len` up to the next multiple of [`WORD`]
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// Right-pad `data` with zero bytes up to the next multiple of `size`
///
/// Input that is already aligned is returned unchanged.
pub fn rpad(size: usize, data: &[u8]) -> Vec<u8> {
    if size == 0 {
        return data.to_vec();
    }
    let mut out = data.to_vec();
    out.resize(data.len().div_ceil(size) * size, 0);
    out
}

/// Append `value` as one big-endian, right-aligned word
pub fn put_word(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&[0u8; WORD - 8]);
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append `payload` followed by zero padding to the next word boundary
pub fn put_padded(out: &mut Vec<u8>, payload: &[u8]) {
    out.extend_from_slice(payload);
    out.resize(out.len() + padded_len(payload.len()) - payload.len(), 0);
}

/// Borrow the word starting at `at`
pub fn word_at(data: &[u8], at: usize) -> Result<&[u8; WORD], CodecError> {
    at.checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or(CodecError::TruncatedInput {
            at,
            needed: WORD,
            available: data.len().saturating_sub(at),
        })
}

/// Low 64 bits of a word; higher-order bytes are ignored
pub fn low_u64(word: &[u8; WORD]) -> u64 {
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    u64::from_be_bytes(low)
}

/// Word value as a `usize`, if every higher-order byte is zero
pub fn to_usize(word: &[u8; WORD]) -> Option<usize> {
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return None;
    }
    usize::try_from(low_u64(word)).ok()
}

/// Render bytes one word per line, for diagnostics
pub fn dump_words(data: &[u8]) -> String {
    let mut out = String::new();
    for chunk in data.chunks(WORD) {
        let _ = writeln!(out, "{}", hex::encode(chunk));
    }
    out
}
