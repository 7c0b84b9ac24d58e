//! Schema derivation from Solidity types and signatures

use alloy_dyn_abi::DynSolType;
use alloy_json_abi::{Event, Function, Param};
use alloy_primitives::keccak256;
use anyhow::{Context, Result};

use crate::domain::Schema;

/// Shape of a Solidity type
///
/// Every fixed-width type (bool, intN, uintN, address, bytesN, function)
/// collapses to [`Schema::Static`]; `bytes` and `string` collapse to
/// [`Schema::Dynamic`].
pub fn schema_for_type(ty: &DynSolType) -> Schema {
    match ty {
        DynSolType::Bool
        | DynSolType::Int(_)
        | DynSolType::Uint(_)
        | DynSolType::FixedBytes(_)
        | DynSolType::Address
        | DynSolType::Function => Schema::Static,
        DynSolType::Bytes | DynSolType::String => Schema::Dynamic,
        DynSolType::Array(element) => Schema::array(schema_for_type(element)),
        DynSolType::FixedArray(element, k) => Schema::array_k(*k, schema_for_type(element)),
        DynSolType::Tuple(fields) => Schema::tuple(fields.iter().map(schema_for_type)),
    }
}

/// Parse a Solidity type string, e.g. `(uint256,string[])`
pub fn parse_schema(ty: &str) -> Result<Schema> {
    let ty = parse_type(ty)?;
    Ok(schema_for_type(&ty))
}

/// Parse a Solidity type string into its alloy representation
pub fn parse_type(ty: &str) -> Result<DynSolType> {
    DynSolType::parse(ty.trim()).with_context(|| format!("Failed to parse type '{}'", ty))
}

/// Compute the 4-byte function selector from a canonical signature
pub fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// A function's calling convention: selector plus parameter shapes
#[derive(Debug, Clone)]
pub struct FunctionShape {
    /// Function name
    pub name: String,
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Input types, in order
    pub input_types: Vec<DynSolType>,
    /// Inputs as one tuple schema
    pub inputs: Schema,
    /// Outputs as one tuple schema (empty when parsed from a bare signature)
    pub outputs: Schema,
}

impl FunctionShape {
    /// Parse a human-readable signature, e.g. `transfer(address to, uint256)`
    pub fn parse(signature: &str) -> Result<Self> {
        let function = Function::parse(signature.trim())
            .with_context(|| format!("Invalid function signature '{}'", signature))?;
        Self::from_function(&function)
    }

    /// Build from a JSON ABI function entry
    pub fn from_function(function: &Function) -> Result<Self> {
        let input_types = param_types(&function.inputs)?;
        let output_types = param_types(&function.outputs)?;
        let signature = function.signature();
        Ok(Self {
            name: function.name.clone(),
            selector: compute_selector(&signature),
            signature,
            inputs: Schema::tuple(input_types.iter().map(schema_for_type)),
            outputs: Schema::tuple(output_types.iter().map(schema_for_type)),
            input_types,
        })
    }

    /// Selector as a hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// Shape of an event's data section (its non-indexed inputs)
pub fn event_data_schema(event: &Event) -> Result<Schema> {
    let fields = event
        .inputs
        .iter()
        .filter(|param| !param.indexed)
        .map(|param| {
            let ty = param.selector_type();
            parse_type(&ty)
                .with_context(|| format!("event '{}' param '{}'", event.name, param.name))
                .map(|ty| schema_for_type(&ty))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Schema::Tuple(fields))
}

fn param_types(params: &[Param]) -> Result<Vec<DynSolType>> {
    params
        .iter()
        .map(|param| {
            let ty = param.selector_type();
            parse_type(&ty).with_context(|| format!("param '{}'", param.name))
        })
        .collect()
}
