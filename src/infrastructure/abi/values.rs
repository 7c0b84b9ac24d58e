//! Conversion from alloy values into codec items

use alloy_dyn_abi::{DynSolType, DynSolValue};
use anyhow::{bail, Context, Result};

use crate::domain::Item;

/// Convert an alloy value into an [`Item`]
///
/// Scalars must fit in 64 bits, so addresses, `bytesN` and wide or
/// negative integers are rejected rather than truncated.
pub fn item_from_value(value: &DynSolValue) -> Result<Item> {
    Ok(match value {
        DynSolValue::Bool(b) => Item::bool(*b),
        DynSolValue::Uint(u, bits) => {
            if u.bit_len() > 64 {
                bail!("uint{} value {} does not fit in 64 bits", bits, u);
            }
            Item::uint(u.as_limbs()[0], width(*bits))
        }
        DynSolValue::Int(i, bits) => {
            if i.is_negative() {
                bail!("negative int{} value {} is not supported", bits, i);
            }
            let raw = i.into_raw();
            if raw.bit_len() > 64 {
                bail!("int{} value {} does not fit in 64 bits", bits, i);
            }
            Item::uint(raw.as_limbs()[0], width(*bits))
        }
        DynSolValue::Address(addr) => bail!("address {} does not fit in 64 bits", addr),
        DynSolValue::FixedBytes(_, size) => bail!("bytes{} values are not supported", size),
        DynSolValue::Function(_) => bail!("function pointers are not supported"),
        DynSolValue::Bytes(raw) => Item::bytes(raw.clone()),
        DynSolValue::String(text) => Item::string(text.clone()),
        DynSolValue::Array(values) => Item::Array(items_from_values(values)?),
        DynSolValue::FixedArray(values) => Item::ArrayK(items_from_values(values)?),
        DynSolValue::Tuple(values) => Item::Tuple(items_from_values(values)?),
    })
}

fn items_from_values(values: &[DynSolValue]) -> Result<Vec<Item>> {
    values.iter().map(item_from_value).collect()
}

fn width(bits: usize) -> u16 {
    u16::try_from(bits).unwrap_or(u16::MAX)
}

/// Parse argument strings against their types into one tuple item
pub fn coerce_args(types: &[DynSolType], args: &[&str]) -> Result<Item> {
    if args.len() != types.len() {
        bail!(
            "Argument count mismatch: expected {} arguments, got {}",
            types.len(),
            args.len()
        );
    }

    let fields = types
        .iter()
        .zip(args)
        .enumerate()
        .map(|(idx, (ty, arg))| {
            let value = ty.coerce_str(arg).with_context(|| {
                format!("Failed to parse argument {} (type {})", idx + 1, ty.sol_type_name())
            })?;
            item_from_value(&value).with_context(|| format!("argument {}", idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Item::Tuple(fields))
}
