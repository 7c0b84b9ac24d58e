//! ABI codec
//!
//! Encoding follows the Solidity contract ABI: 32-byte words, static values
//! inlined in a container's head and dynamic values referenced by offset
//! into its tail.

mod decode;
mod encode;
mod error;
mod pool;
mod word;

pub use decode::decode;
pub use encode::{encode, encoded_len, head_len, layout, Layout, Slot};
pub use error::CodecError;
pub use pool::{ItemPool, Pooled};
pub use word::{dump_words, padded_len, rpad, WORD};
