//! ABI decode command for decoding calldata and raw parameter encodings

use std::path::PathBuf;

use anyhow::{bail, Result};

use super::{parse_hex, ToolResult};
use crate::codec::ItemPool;
use crate::domain::{Item, Schema};
use crate::infrastructure::abi::{parse_schema, AbiScanner, FunctionShape};

/// What the input bytes are declared to hold
#[derive(Debug)]
pub enum Target {
    /// A bare parameter encoding with this shape
    Params(Schema),
    /// Calldata for this function, selector first
    Function(FunctionShape),
}

/// Interpret a target description
///
/// Accepts a Solidity type (`(uint256,string[])`), a function signature
/// (`transfer(address,uint256)`), or `Contract.function` looked up in the
/// ABI artifacts under `abi_roots`.
pub fn resolve_target(query: &str, abi_roots: &[PathBuf]) -> Result<Target> {
    let query = query.trim();
    if let Ok(schema) = parse_schema(query) {
        return Ok(Target::Params(schema));
    }
    if query.contains('(') {
        return Ok(Target::Function(FunctionShape::parse(query)?));
    }
    if query.contains('.') {
        return Ok(Target::Function(AbiScanner::resolve_function(abi_roots, query)?));
    }
    bail!("'{}' is neither a type, a function signature nor Contract.function", query)
}

/// Decode `input` (hex) as described by `target`
///
/// With `calldata` set, a bare parameter target skips a leading 4-byte
/// selector; function targets always expect and verify one.
pub fn decode(
    target: &Target,
    input: &str,
    calldata: bool,
    pool: &ItemPool,
) -> Result<ToolResult> {
    let data = parse_hex(input)?;

    let (schema, payload, signature) = match target {
        Target::Params(schema) => {
            let payload = if calldata {
                strip_selector(&data)?.1
            } else {
                &data[..]
            };
            (schema, payload, None)
        }
        Target::Function(shape) => {
            let (selector, payload) = strip_selector(&data)?;
            if selector != shape.selector {
                bail!(
                    "selector mismatch: got 0x{}, expected {}",
                    hex::encode(selector),
                    shape.selector_hex()
                );
            }
            (&shape.inputs, payload, Some(shape.signature.as_str()))
        }
    };

    let (mut pooled, consumed) = pool.decode(payload, schema)?;

    let mut result = ToolResult::new("ABI Decode");
    if let Some(signature) = signature {
        result = result.add("signature", signature);
    }
    result = result
        .add("schema", schema.to_string())
        .add("consumed", consumed.to_string())
        .add("trailing", (payload.len() - consumed).to_string());
    if let Some(item) = pooled.item() {
        result = result
            .add("decoded", format_item(item))
            .with_data(serde_json::to_value(item)?);
    }
    pooled.done();

    Ok(result)
}

fn strip_selector(data: &[u8]) -> Result<([u8; 4], &[u8])> {
    if data.len() < 4 {
        bail!("calldata too short (need at least 4 bytes for selector)");
    }
    let (selector, rest) = data.split_at(4);
    let mut out = [0u8; 4];
    out.copy_from_slice(selector);
    Ok((out, rest))
}

/// Format a decoded item for display
pub fn format_item(item: &Item) -> String {
    match item {
        Item::Uint { value, .. } => value.to_string(),
        Item::Bool(b) => b.to_string(),
        Item::Bytes(bytes) => {
            if bytes.len() <= 32 {
                format!("0x{}", hex::encode(bytes))
            } else {
                format!("0x{}… ({} bytes)", hex::encode(&bytes[..32]), bytes.len())
            }
        }
        Item::String(s) => {
            let count = s.chars().count();
            if count <= 64 {
                format!("\"{}\"", s)
            } else {
                let head: String = s.chars().take(64).collect();
                format!("\"{}…\" ({} chars)", head, count)
            }
        }
        Item::Array(arr) | Item::ArrayK(arr) => {
            let max_items = 10;
            let items: Vec<String> = arr.iter().take(max_items).map(format_item).collect();
            if arr.len() > max_items {
                format!("[{}, …] ({} items)", items.join(", "), arr.len())
            } else {
                format!("[{}]", items.join(", "))
            }
        }
        Item::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_item).collect();
            format!("({})", items.join(", "))
        }
    }
}
