//! ABI encode commands

use alloy_dyn_abi::DynSolType;
use anyhow::{Context, Result};

use super::{render_bytes, ToolResult};
use crate::codec::encode as abi_encode;
use crate::config::OutputFormat;
use crate::domain::Item;
use crate::infrastructure::abi::{coerce_args, parse_type, FunctionShape};

/// Encode function calldata: selector followed by the encoded arguments
pub fn encode_call(signature: &str, args: &[&str], format: OutputFormat) -> Result<ToolResult> {
    let shape = FunctionShape::parse(signature)?;
    let item = coerce_args(&shape.input_types, args)?;
    item.check(&shape.inputs)?;

    let data = abi_encode(&item);
    let mut calldata = shape.selector.to_vec();
    calldata.extend_from_slice(&data);

    Ok(ToolResult::new("ABI Encode")
        .add("signature", shape.signature.clone())
        .add("selector", shape.selector_hex())
        .add("bytes", calldata.len().to_string())
        .add("calldata", format!("0x{}", hex::encode(&calldata)))
        .add("data", render_bytes(&data, format)))
}

/// Encode arguments against a parameter list such as `(uint64,string)`
pub fn encode_params(types: &str, args: &[&str], format: OutputFormat) -> Result<ToolResult> {
    let ty = parse_type(types)?;
    let types = match ty {
        DynSolType::Tuple(fields) => fields,
        other => vec![other],
    };
    let item = coerce_args(&types, args)?;
    Ok(encoded(item, format))
}

/// Encode an item given in its JSON form
pub fn encode_json(json: &str, format: OutputFormat) -> Result<ToolResult> {
    let item: Item = serde_json::from_str(json).context("Invalid item JSON")?;
    Ok(encoded(item, format))
}

fn encoded(item: Item, format: OutputFormat) -> ToolResult {
    let data = abi_encode(&item);
    ToolResult::new("ABI Encode")
        .add("schema", item.schema().to_string())
        .add("bytes", data.len().to_string())
        .add("data", render_bytes(&data, format))
}
