//! Schema - shape descriptors used to drive decoding

use std::fmt;

use crate::codec::WORD;

/// Shape of an encoded value, without the value itself
///
/// Every uint/bool/address/fixed-bytes type collapses to `Static`, and
/// every bytes/string type collapses to `Dynamic`. A schema is supplied
/// out-of-band (usually derived from an interface signature) to tell the
/// decoder how to walk an otherwise untyped byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Schema {
    /// One inline word
    Static,
    /// Length-prefixed payload
    Dynamic,
    /// Ordered fields
    Tuple(Vec<Schema>),
    /// Dynamic-length list, prefixed by an element count
    Array(Box<Schema>),
    /// Fixed-length list of `k` elements, no count prefix
    ArrayK(usize, Box<Schema>),
}

impl Schema {
    pub fn tuple(fields: impl IntoIterator<Item = Schema>) -> Self {
        Self::Tuple(fields.into_iter().collect())
    }

    pub fn array(element: Schema) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn array_k(k: usize, element: Schema) -> Self {
        Self::ArrayK(k, Box::new(element))
    }

    /// Whether values of this shape are referenced by offset
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Static => false,
            Self::Dynamic | Self::Array(_) => true,
            Self::Tuple(fields) => fields.iter().any(Schema::is_dynamic),
            Self::ArrayK(_, element) => element.is_dynamic(),
        }
    }

    /// Bytes this shape occupies in its parent's head
    ///
    /// Dynamic shapes take a single offset word. Static shapes are inlined,
    /// so a static tuple of two scalars takes 64 bytes.
    pub fn head_len(&self) -> usize {
        if self.is_dynamic() {
            return WORD;
        }
        match self {
            Self::Tuple(fields) => fields.iter().map(Schema::head_len).sum(),
            Self::ArrayK(k, element) => k.saturating_mul(element.head_len()),
            _ => WORD,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Tuple(_) => "tuple",
            Self::Array(_) => "array",
            Self::ArrayK(_, _) => "fixed array",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Dynamic => f.write_str("dynamic"),
            Self::Tuple(fields) => {
                f.write_str("(")?;
                for (idx, field) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str(")")
            }
            Self::Array(element) => write!(f, "{}[]", element),
            Self::ArrayK(k, element) => write!(f, "{}[{}]", element, k),
        }
    }
}
