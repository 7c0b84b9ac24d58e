//! Command modules
//!
//! - toolkit: encode, decode and schema inspection commands behind the CLI

pub mod toolkit;
