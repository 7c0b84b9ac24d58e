//! ABI infrastructure - Alloy-based signature parsing and artifact lookup

mod scanner;
mod signature;
mod values;

pub use scanner::AbiScanner;
pub use signature::{
    compute_selector, event_data_schema, parse_schema, parse_type, schema_for_type, FunctionShape,
};
pub use values::{coerce_args, item_from_value};
