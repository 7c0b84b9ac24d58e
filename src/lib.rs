//! abicodec - Ethereum contract ABI encoding over untyped value trees
//!
//! [`encode`] lays an [`Item`] out with the ABI head/tail scheme and
//! [`decode`] walks bytes back into an `Item` guided by a [`Schema`]. The
//! [`infrastructure::abi`] layer derives schemas from Solidity signatures
//! and JSON ABI descriptions.

pub mod codec;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod modules;

pub use codec::{decode, encode, CodecError, ItemPool, Pooled};
pub use domain::{Item, Schema};
