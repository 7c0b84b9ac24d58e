//! ABI domain models
//!
//! This module defines the value tree ([`Item`]) and the shape descriptor
//! ([`Schema`]) shared by the encoder and the decoder.

mod item;
mod schema;

pub use item::Item;
pub use schema::Schema;
