//! Infrastructure layer - External library integrations
//!
//! This layer contains:
//! - Alloy-based Solidity type and signature parsing
//! - JSON ABI artifact lookup on the filesystem

pub mod abi;
