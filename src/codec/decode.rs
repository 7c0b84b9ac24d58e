//! ABI decoder
//!
//! The decoder walks a byte buffer guided by a [`Schema`] and rebuilds the
//! value tree. It recovers shape only: every static leaf comes back as a
//! 64-bit [`Item::Uint`] (read from the low 8 bytes of its word) and every
//! dynamic leaf as [`Item::String`] when the payload is valid UTF-8, or
//! [`Item::Bytes`] otherwise. Whether a word was originally a bool, an
//! address or a `uint8` cannot be told from the bytes and is not guessed.
//!
//! Offset words may alias one another, so a short input can describe a
//! tree far larger than itself. Every node, list reservation and payload
//! word is charged against a budget of `(len + 32) * weight(schema)` units,
//! where the weight counts schema nodes without expanding fixed arrays; an
//! exhausted budget fails with [`CodecError::LimitExceeded`].

use std::cell::Cell;

use tracing::trace;

use super::word::{low_u64, to_usize, word_at, WORD};
use super::CodecError;
use crate::domain::{Item, Schema};

/// Backing storage for the vectors of a decoded tree
pub(crate) trait Storage {
    /// An empty list able to hold `len` items
    fn list(&self, len: usize) -> Vec<Item>;
    /// An empty byte buffer able to hold `len` bytes
    fn buffer(&self, len: usize) -> Vec<u8>;
}

/// Plain allocation, used when no pool is involved
pub(crate) struct Heap;

impl Storage for Heap {
    fn list(&self, len: usize) -> Vec<Item> {
        Vec::with_capacity(len)
    }

    fn buffer(&self, len: usize) -> Vec<u8> {
        Vec::with_capacity(len)
    }
}

/// Decode the value described by `schema` from the start of `data`
///
/// Returns the item and the number of bytes its full encoding spans,
/// tail entries included. Bytes after that point are left alone, so
/// several values (or unrelated trailing data) may share one buffer.
///
/// ```
/// use abicodec::{decode, encode, Item, Schema};
///
/// let mut data = encode(&Item::tuple([Item::uint8(42), Item::string("foo")]));
/// data.extend_from_slice(b"extra");
///
/// let schema = Schema::tuple([Schema::Static, Schema::Dynamic]);
/// let (item, consumed) = decode(&data, &schema).unwrap();
/// assert_eq!(item, Item::tuple([Item::uint64(42), Item::string("foo")]));
/// assert_eq!(&data[consumed..], b"extra");
/// ```
pub fn decode(data: &[u8], schema: &Schema) -> Result<(Item, usize), CodecError> {
    decode_with(&Heap, data, schema)
}

pub(crate) fn decode_with<S: Storage>(
    store: &S,
    data: &[u8],
    schema: &Schema,
) -> Result<(Item, usize), CodecError> {
    let limit = data.len().saturating_add(WORD).saturating_mul(weight(schema));
    let decoder = Decoder {
        data,
        store,
        limit,
        budget: Cell::new(limit),
    };
    decoder.item(0, schema).inspect_err(|err| {
        trace!(%err, %schema, len = data.len(), "abi decode failed");
    })
}

/// Number of schema nodes, with fixed arrays counted once
fn weight(schema: &Schema) -> usize {
    match schema {
        Schema::Static | Schema::Dynamic => 1,
        Schema::Tuple(fields) => fields
            .iter()
            .fold(1usize, |total, field| total.saturating_add(weight(field))),
        Schema::Array(element) | Schema::ArrayK(_, element) => {
            weight(element).saturating_add(1)
        }
    }
}

struct Decoder<'d, S> {
    data: &'d [u8],
    store: &'d S,
    limit: usize,
    budget: Cell<usize>,
}

impl<S: Storage> Decoder<'_, S> {
    /// Decode the value starting at `at`, returning it with its extent
    fn item(&self, at: usize, schema: &Schema) -> Result<(Item, usize), CodecError> {
        self.charge(1)?;
        match schema {
            Schema::Static => {
                let word = word_at(self.data, at)?;
                Ok((Item::uint64(low_u64(word)), WORD))
            }
            Schema::Dynamic => self.payload(at),
            Schema::Tuple(fields) => {
                self.ensure_arity(at, fields.iter().map(Schema::head_len), fields.len())?;
                let (items, consumed) = self.fields(at, fields.len(), fields.iter())?;
                Ok((Item::Tuple(items), consumed))
            }
            Schema::Array(element) => {
                let count = self.length(at)?;
                let base = at + WORD;
                // Each element needs at least its head slot; checked before
                // allocating so a forged count cannot reserve unbounded memory.
                let needed = count.checked_mul(element.head_len().max(1));
                let available = self.remaining(base);
                if needed.map_or(true, |needed| needed > available) {
                    return Err(CodecError::TruncatedInput {
                        at: base,
                        needed: needed.unwrap_or(usize::MAX),
                        available,
                    });
                }
                self.charge(count)?;
                let elements = std::iter::repeat(element.as_ref()).take(count);
                let (items, consumed) = self.fields(base, count, elements)?;
                Ok((Item::Array(items), WORD + consumed))
            }
            Schema::ArrayK(k, element) => {
                self.charge(*k)?;
                let head = element.head_len();
                self.ensure_arity(at, std::iter::repeat(head).take(*k), *k)?;
                let elements = std::iter::repeat(element.as_ref()).take(*k);
                let (items, consumed) = self.fields(at, *k, elements)?;
                Ok((Item::ArrayK(items), consumed))
            }
        }
    }

    /// Decode a length-prefixed payload at `at`
    fn payload(&self, at: usize) -> Result<(Item, usize), CodecError> {
        let len = self.length(at)?;
        let start = at + WORD;
        let available = self.remaining(start);
        let padded = len.checked_next_multiple_of(WORD).unwrap_or(usize::MAX);
        if padded > available {
            return Err(CodecError::TruncatedInput {
                at: start,
                needed: padded,
                available,
            });
        }

        self.charge(padded / WORD)?;
        let mut raw = self.store.buffer(len);
        raw.extend_from_slice(&self.data[start..start + len]);
        let item = match String::from_utf8(raw) {
            Ok(text) => Item::String(text),
            Err(err) => Item::Bytes(err.into_bytes()),
        };
        Ok((item, WORD + padded))
    }

    /// Decode `count` fields whose head starts at `base`
    ///
    /// The extent is the furthest byte reached by either the head or any
    /// tail entry, measured from `base`.
    fn fields<'s>(
        &self,
        base: usize,
        count: usize,
        schemas: impl Iterator<Item = &'s Schema>,
    ) -> Result<(Vec<Item>, usize), CodecError> {
        let mut items = self.store.list(count);
        let mut cursor = base;
        let mut extent = 0;
        for field in schemas {
            if field.is_dynamic() {
                let offset = self.offset(base, cursor)?;
                cursor += WORD;
                let (item, consumed) = self.item(base + offset, field)?;
                extent = extent.max(offset + consumed);
                items.push(item);
            } else {
                let (item, consumed) = self.item(cursor, field)?;
                cursor += consumed;
                items.push(item);
            }
        }
        Ok((items, (cursor - base).max(extent)))
    }

    /// Read the offset word at `at`, checked against the buffer bounds
    fn offset(&self, base: usize, at: usize) -> Result<usize, CodecError> {
        let word = word_at(self.data, at)?;
        to_usize(word)
            .filter(|offset| {
                base.checked_add(*offset)
                    .is_some_and(|start| start < self.data.len())
            })
            .ok_or_else(|| CodecError::InvalidOffset {
                offset: to_usize(word).map_or(u64::MAX, |_| low_u64(word)),
                base,
                len: self.data.len(),
            })
    }

    /// Read a length or count word at `at`
    fn length(&self, at: usize) -> Result<usize, CodecError> {
        let word = word_at(self.data, at)?;
        to_usize(word).ok_or(CodecError::TruncatedInput {
            at: at + WORD,
            needed: usize::MAX,
            available: self.remaining(at + WORD),
        })
    }

    /// Fail with `ArityMismatch` when the declared heads overrun the buffer
    fn ensure_arity(
        &self,
        at: usize,
        heads: impl Iterator<Item = usize>,
        expected: usize,
    ) -> Result<(), CodecError> {
        let available = self.remaining(at);
        let mut used = 0usize;
        let mut found = 0;
        for head in heads {
            match used.checked_add(head) {
                Some(next) if next <= available => {
                    used = next;
                    found += 1;
                }
                _ => break,
            }
        }
        if found == expected {
            Ok(())
        } else {
            Err(CodecError::ArityMismatch { expected, found })
        }
    }

    /// Take `units` from the budget
    fn charge(&self, units: usize) -> Result<(), CodecError> {
        match self.budget.get().checked_sub(units) {
            Some(left) => {
                self.budget.set(left);
                Ok(())
            }
            None => Err(CodecError::LimitExceeded {
                limit: self.limit,
                len: self.data.len(),
            }),
        }
    }

    fn remaining(&self, at: usize) -> usize {
        self.data.len().saturating_sub(at)
    }
}
