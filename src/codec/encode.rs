//! ABI encoder
//!
//! Containers are encoded in two passes: [`layout`] sizes every field and
//! assigns each one an inline slot or an offset into the tail, then the
//! head and tail are serialized from that plan.

use super::word::{padded_len, put_padded, put_word, WORD};
use crate::domain::Item;

/// Where a field lives inside its container's head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Static field, its full encoding sits in the head
    Inline,
    /// Dynamic field, the head holds this offset (from the head start)
    Offset(usize),
}

/// Head/tail plan of a container's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Bytes taken by the head
    pub head_len: usize,
    /// Bytes taken by the tail
    pub tail_len: usize,
    /// One slot per field, in order
    pub slots: Vec<Slot>,
}

/// Plan the head and tail of a container holding `fields`
pub fn layout(fields: &[Item]) -> Layout {
    let head_len = fields.iter().map(head_len).sum();
    let mut tail_len = 0;
    let slots = fields
        .iter()
        .map(|field| {
            if field.is_dynamic() {
                let slot = Slot::Offset(head_len + tail_len);
                tail_len += encoded_len(field);
                slot
            } else {
                Slot::Inline
            }
        })
        .collect();
    Layout {
        head_len,
        tail_len,
        slots,
    }
}

/// Bytes `item` occupies in its parent's head
pub fn head_len(item: &Item) -> usize {
    if item.is_dynamic() {
        WORD
    } else {
        encoded_len(item)
    }
}

/// Exact size of `encode(item)`, without serializing
pub fn encoded_len(item: &Item) -> usize {
    match item {
        Item::Uint { .. } | Item::Bool(_) => WORD,
        Item::Bytes(raw) => WORD + padded_len(raw.len()),
        Item::String(text) => WORD + padded_len(text.len()),
        Item::Array(items) => WORD + container_len(items),
        Item::ArrayK(items) | Item::Tuple(items) => container_len(items),
    }
}

fn container_len(items: &[Item]) -> usize {
    items
        .iter()
        .map(|item| {
            if item.is_dynamic() {
                WORD + encoded_len(item)
            } else {
                encoded_len(item)
            }
        })
        .sum()
}

/// Encode `item` with the ABI head/tail layout
///
/// The output is always a whole number of words. A top-level dynamic value
/// is written directly, with no leading offset word.
pub fn encode(item: &Item) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(item));
    write_item(item, &mut out);
    out
}

fn write_item(item: &Item, out: &mut Vec<u8>) {
    match item {
        Item::Uint { value, .. } => put_word(out, *value),
        Item::Bool(value) => put_word(out, u64::from(*value)),
        Item::Bytes(raw) => write_payload(raw, out),
        Item::String(text) => write_payload(text.as_bytes(), out),
        Item::Array(items) => {
            put_word(out, items.len() as u64);
            write_container(items, out);
        }
        Item::ArrayK(items) | Item::Tuple(items) => write_container(items, out),
    }
}

fn write_payload(payload: &[u8], out: &mut Vec<u8>) {
    put_word(out, payload.len() as u64);
    put_padded(out, payload);
}

fn write_container(items: &[Item], out: &mut Vec<u8>) {
    let plan = layout(items);
    for (item, slot) in items.iter().zip(&plan.slots) {
        match slot {
            Slot::Inline => write_item(item, out),
            Slot::Offset(offset) => put_word(out, *offset as u64),
        }
    }
    for (item, slot) in items.iter().zip(&plan.slots) {
        if let Slot::Offset(_) = slot {
            write_item(item, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_offsets() {
        let fields = [
            Item::uint8(42),
            Item::string("hello"),
            Item::tuple([Item::uint8(1), Item::uint8(2)]),
            Item::array([Item::uint8(3)]),
        ];
        let plan = layout(&fields);
        // 32 + 32 + 64 + 32
        assert_eq!(plan.head_len, 160);
        assert_eq!(
            plan.slots,
            vec![
                Slot::Inline,
                Slot::Offset(160),
                Slot::Inline,
                Slot::Offset(160 + 64),
            ]
        );
        assert_eq!(plan.tail_len, 64 + 64);
    }

    #[test]
    fn test_encoded_len_matches_output() {
        let item = Item::tuple([
            Item::uint8(1),
            Item::array([Item::string("a"), Item::string("b".repeat(40))]),
            Item::array_k([Item::bytes(vec![]), Item::bytes(vec![1, 2, 3])]),
        ]);
        assert_eq!(encoded_len(&item), encode(&item).len());
    }

    #[test]
    fn test_scalar_words() {
        assert_eq!(encode(&Item::bool(true))[31], 1);
        assert_eq!(encode(&Item::bool(false)), vec![0u8; 32]);
        let max = encode(&Item::uint64(u64::MAX));
        assert!(max[..24].iter().all(|b| *b == 0));
        assert!(max[24..].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_padding() {
        for len in [0usize, 1, 31, 32, 33, 64, 100] {
            let raw = vec![0xaa; len];
            let out = encode(&Item::bytes(raw));
            assert_eq!(out.len(), 32 + len.div_ceil(32) * 32);
            assert!(out[32 + len..].iter().all(|b| *b == 0));
        }
    }
}
