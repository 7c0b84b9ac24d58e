//! Schema inspection command

use std::path::PathBuf;

use anyhow::Result;

use super::decode::{resolve_target, Target};
use super::ToolResult;
use crate::domain::Schema;

/// Show the shape the decoder would use for a type or function
pub fn describe(query: &str, abi_roots: &[PathBuf]) -> Result<ToolResult> {
    let result = match resolve_target(query, abi_roots)? {
        Target::Params(schema) => shape(ToolResult::new("ABI Schema"), &schema),
        Target::Function(function) => {
            let result = ToolResult::new("ABI Schema")
                .add("signature", function.signature.clone())
                .add("selector", function.selector_hex());
            let result = shape(result, &function.inputs);
            if function.outputs == Schema::Tuple(Vec::new()) {
                result
            } else {
                result.add("outputs", function.outputs.to_string())
            }
        }
    };
    Ok(result)
}

fn shape(result: ToolResult, schema: &Schema) -> ToolResult {
    result
        .add("schema", schema.to_string())
        .add("dynamic", schema.is_dynamic().to_string())
        .add("head", format!("{} bytes", schema.head_len()))
}
