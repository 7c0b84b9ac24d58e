//! Reusable backing storage for decoded trees
//!
//! Hot paths that decode many values (a stream of event logs, say) can
//! route decoding through an [`ItemPool`] so the vectors of one tree are
//! reused by the next. Buffers only return to the pool through an explicit
//! [`Pooled::done`] or [`ItemPool::release`]; dropping a tree simply frees it.

use std::sync::Mutex;

use tracing::trace;

use super::decode::{decode_with, Storage};
use super::CodecError;
use crate::domain::{Item, Schema};

/// Thread-safe pool of item lists and byte buffers
#[derive(Debug)]
pub struct ItemPool {
    lists: Mutex<Vec<Vec<Item>>>,
    buffers: Mutex<Vec<Vec<u8>>>,
    capacity: usize,
}

impl Default for ItemPool {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl ItemPool {
    /// Buffers of each kind retained when no capacity is configured
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::default()
    }

    /// Pool retaining at most `capacity` lists and `capacity` byte buffers
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lists: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Decode like [`decode`](super::decode), drawing storage from the pool
    ///
    /// The returned handle owns the tree; call [`Pooled::done`] to hand its
    /// storage back once the item is no longer needed.
    pub fn decode(&self, data: &[u8], schema: &Schema) -> Result<(Pooled<'_>, usize), CodecError> {
        let (item, consumed) = decode_with(self, data, schema)?;
        Ok((
            Pooled {
                item: Some(item),
                pool: self,
            },
            consumed,
        ))
    }

    /// Return the storage of `item` to the pool
    ///
    /// Scalar leaves own nothing poolable, so releasing them is a no-op.
    pub fn release(&self, item: Item) {
        let (Ok(mut lists), Ok(mut buffers)) = (self.lists.lock(), self.buffers.lock()) else {
            return;
        };
        self.recycle(item, &mut lists, &mut buffers);
        trace!(
            lists = lists.len(),
            buffers = buffers.len(),
            "released decoded item"
        );
    }

    /// Number of idle lists and byte buffers currently held
    pub fn idle(&self) -> (usize, usize) {
        let lists = self.lists.lock().map_or(0, |lists| lists.len());
        let buffers = self.buffers.lock().map_or(0, |buffers| buffers.len());
        (lists, buffers)
    }

    fn recycle(&self, item: Item, lists: &mut Vec<Vec<Item>>, buffers: &mut Vec<Vec<u8>>) {
        match item {
            Item::Uint { .. } | Item::Bool(_) => {}
            Item::Bytes(raw) => self.keep(buffers, raw),
            Item::String(text) => self.keep(buffers, text.into_bytes()),
            Item::Array(mut items) | Item::ArrayK(mut items) | Item::Tuple(mut items) => {
                for child in items.drain(..) {
                    self.recycle(child, lists, buffers);
                }
                self.keep(lists, items);
            }
        }
    }

    fn keep<T>(&self, idle: &mut Vec<Vec<T>>, mut buffer: Vec<T>) {
        if idle.len() < self.capacity {
            buffer.clear();
            idle.push(buffer);
        }
    }
}

impl Storage for ItemPool {
    fn list(&self, len: usize) -> Vec<Item> {
        let reused = self.lists.lock().ok().and_then(|mut lists| lists.pop());
        match reused {
            Some(mut list) => {
                list.reserve(len);
                list
            }
            None => Vec::with_capacity(len),
        }
    }

    fn buffer(&self, len: usize) -> Vec<u8> {
        let reused = self.buffers.lock().ok().and_then(|mut buffers| buffers.pop());
        match reused {
            Some(mut buffer) => {
                buffer.reserve(len);
                buffer
            }
            None => Vec::with_capacity(len),
        }
    }
}

/// A decoded tree whose storage came from an [`ItemPool`]
///
/// The handle is move-only. `done` clears it, so calling it again (or on a
/// handle already detached with `into_item`) does nothing.
#[derive(Debug)]
pub struct Pooled<'p> {
    item: Option<Item>,
    pool: &'p ItemPool,
}

impl Pooled<'_> {
    /// The decoded item, until `done` is called
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    /// Hand the tree's storage back to the pool
    pub fn done(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }

    /// Detach the tree from the pool and keep it
    pub fn into_item(mut self) -> Option<Item> {
        self.item.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    fn sample() -> (Vec<u8>, Schema) {
        let item = Item::tuple([
            Item::string("foo"),
            Item::array([Item::string("bar"), Item::string("baz")]),
        ]);
        let schema = Schema::tuple([Schema::Dynamic, Schema::array(Schema::Dynamic)]);
        (encode(&item), schema)
    }

    #[test]
    fn test_pooled_decode_matches_plain() {
        let (data, schema) = sample();
        let pool = ItemPool::new();
        let (pooled, consumed) = pool.decode(&data, &schema).unwrap();
        let (plain, plain_consumed) = crate::codec::decode(&data, &schema).unwrap();
        assert_eq!(pooled.item(), Some(&plain));
        assert_eq!(consumed, plain_consumed);
    }

    #[test]
    fn test_done_is_idempotent() {
        let (data, schema) = sample();
        let pool = ItemPool::new();
        let (mut pooled, _) = pool.decode(&data, &schema).unwrap();
        pooled.done();
        assert!(pooled.item().is_none());
        let idle = pool.idle();
        // 2 lists (tuple, array) and 3 payload buffers
        assert_eq!(idle, (2, 3));

        pooled.done();
        assert_eq!(pool.idle(), idle);
    }

    #[test]
    fn test_buffers_are_reused() {
        let (data, schema) = sample();
        let pool = ItemPool::new();
        for _ in 0..10 {
            let (mut pooled, _) = pool.decode(&data, &schema).unwrap();
            pooled.done();
        }
        assert_eq!(pool.idle(), (2, 3));
    }

    #[test]
    fn test_capacity_bound() {
        let (data, schema) = sample();
        let pool = ItemPool::with_capacity(1);
        let (mut pooled, _) = pool.decode(&data, &schema).unwrap();
        pooled.done();
        assert_eq!(pool.idle(), (1, 1));
    }

    #[test]
    fn test_release_scalar_is_noop() {
        let pool = ItemPool::new();
        pool.release(Item::uint64(1));
        assert_eq!(pool.idle(), (0, 0));
    }

    #[test]
    fn test_into_item_detaches() {
        let (data, schema) = sample();
        let pool = ItemPool::new();
        let (pooled, _) = pool.decode(&data, &schema).unwrap();
        let item = pooled.into_item().unwrap();
        assert_eq!(item.elements().map(<[Item]>::len), Some(2));
        assert_eq!(pool.idle(), (0, 0));
    }
}
