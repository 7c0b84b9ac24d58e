//! Item - the value tree consumed by encode and produced by decode

use serde::{Deserialize, Serialize};

use super::Schema;
use crate::codec::CodecError;

/// An ABI value
///
/// Scalars are limited to 64 bits of payload. `bits` on [`Item::Uint`] only
/// records the declared width; it never affects the encoding or equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Item {
    /// Unsigned integer, one right-aligned word
    Uint {
        value: u64,
        #[serde(default = "default_bits")]
        bits: u16,
    },
    /// Boolean, one word holding 0 or 1
    Bool(bool),
    /// Raw byte string
    Bytes(#[serde(with = "hex::serde")] Vec<u8>),
    /// UTF-8 text, laid out exactly like `Bytes`
    String(String),
    /// Dynamic-length list
    Array(Vec<Item>),
    /// Fixed-length list; the arity is the number of elements
    ArrayK(Vec<Item>),
    /// Ordered fields
    Tuple(Vec<Item>),
}

fn default_bits() -> u16 {
    64
}

impl Item {
    pub fn uint(value: u64, bits: u16) -> Self {
        Self::Uint { value, bits }
    }

    pub fn uint8(value: u8) -> Self {
        Self::uint(value.into(), 8)
    }

    pub fn uint16(value: u16) -> Self {
        Self::uint(value.into(), 16)
    }

    pub fn uint32(value: u32) -> Self {
        Self::uint(value.into(), 32)
    }

    pub fn uint64(value: u64) -> Self {
        Self::uint(value, 64)
    }

    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn bytes(raw: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(raw.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    pub fn array(elements: impl IntoIterator<Item = Item>) -> Self {
        Self::Array(elements.into_iter().collect())
    }

    /// Fixed-length list whose arity is the number of elements given
    ///
    /// An empty fixed list has no element to classify and is always static,
    /// so it encodes inline as zero bytes. Decode it with the shape from
    /// [`Item::schema`] (`ArrayK(0, Static)`); a declared shape such as
    /// `ArrayK(0, Dynamic)` counts as dynamic and expects an offset word.
    pub fn array_k(elements: impl IntoIterator<Item = Item>) -> Self {
        Self::ArrayK(elements.into_iter().collect())
    }

    /// Fixed-length list with a declared arity
    ///
    /// Fails with [`CodecError::ArityMismatch`] when the element count does
    /// not match `k`, so a malformed list never reaches the encoder.
    pub fn array_k_exact(
        k: usize,
        elements: impl IntoIterator<Item = Item>,
    ) -> Result<Self, CodecError> {
        let elements: Vec<Item> = elements.into_iter().collect();
        if elements.len() != k {
            return Err(CodecError::ArityMismatch {
                expected: k,
                found: elements.len(),
            });
        }
        Ok(Self::ArrayK(elements))
    }

    pub fn tuple(fields: impl IntoIterator<Item = Item>) -> Self {
        Self::Tuple(fields.into_iter().collect())
    }

    /// Whether this value is referenced by offset inside a container
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Uint { .. } | Self::Bool(_) => false,
            Self::Bytes(_) | Self::String(_) | Self::Array(_) => true,
            Self::ArrayK(items) | Self::Tuple(items) => items.iter().any(Item::is_dynamic),
        }
    }

    /// Canonical integer value of a scalar leaf
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint { value, .. } => Some(*value),
            Self::Bool(value) => Some(u64::from(*value)),
            _ => None,
        }
    }

    /// Payload of a byte or text leaf
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(raw) => Some(raw),
            Self::String(text) => Some(text.as_bytes()),
            _ => None,
        }
    }

    /// Elements of a container
    pub fn elements(&self) -> Option<&[Item]> {
        match self {
            Self::Array(items) | Self::ArrayK(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Shape of this value
    ///
    /// Lists take the shape of their first element; an empty list is
    /// described with a `Static` element.
    pub fn schema(&self) -> Schema {
        match self {
            Self::Uint { .. } | Self::Bool(_) => Schema::Static,
            Self::Bytes(_) | Self::String(_) => Schema::Dynamic,
            Self::Array(items) => Schema::array(element_schema(items)),
            Self::ArrayK(items) => Schema::array_k(items.len(), element_schema(items)),
            Self::Tuple(items) => Schema::tuple(items.iter().map(Item::schema)),
        }
    }

    /// Verify this value against a declared shape
    pub fn check(&self, schema: &Schema) -> Result<(), CodecError> {
        match (self, schema) {
            (Self::Uint { .. } | Self::Bool(_), Schema::Static) => Ok(()),
            (Self::Bytes(_) | Self::String(_), Schema::Dynamic) => Ok(()),
            (Self::Tuple(items), Schema::Tuple(fields)) => {
                if items.len() != fields.len() {
                    return Err(CodecError::ArityMismatch {
                        expected: fields.len(),
                        found: items.len(),
                    });
                }
                items
                    .iter()
                    .zip(fields)
                    .try_for_each(|(item, field)| item.check(field))
            }
            (Self::ArrayK(items), Schema::ArrayK(k, element)) => {
                if items.len() != *k {
                    return Err(CodecError::ArityMismatch {
                        expected: *k,
                        found: items.len(),
                    });
                }
                items.iter().try_for_each(|item| item.check(element))
            }
            (Self::Array(items), Schema::Array(element)) => {
                items.iter().try_for_each(|item| item.check(element))
            }
            (item, schema) => Err(CodecError::ShapeMismatch {
                expected: schema.kind(),
                found: item.kind(),
            }),
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Uint { .. } => "uint",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::ArrayK(_) => "fixed array",
            Self::Tuple(_) => "tuple",
        }
    }
}

fn element_schema(items: &[Item]) -> Schema {
    items.first().map(Item::schema).unwrap_or(Schema::Static)
}

/// Structural equality
///
/// Scalars compare by canonical integer value, so `Bool(true)` equals a
/// `Uint` of 1 and bit widths are ignored. Byte and text leaves compare by
/// payload. Containers must be the same variant with equal elements.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_u64(), other.as_u64()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.as_bytes(), other.as_bytes()) {
            return a == b;
        }
        match (self, other) {
            (Self::Array(a), Self::Array(b))
            | (Self::ArrayK(a), Self::ArrayK(b))
            | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Item {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_equality_ignores_width() {
        assert_eq!(Item::uint8(42), Item::uint64(42));
        assert_eq!(Item::bool(true), Item::uint64(1));
        assert_ne!(Item::uint8(42), Item::uint8(43));
    }

    #[test]
    fn test_dynamic_equality_ignores_text_flag() {
        assert_eq!(Item::string("foo"), Item::bytes(b"foo".to_vec()));
        assert_ne!(Item::string("foo"), Item::string("bar"));
        assert_ne!(Item::string(""), Item::uint64(0));
    }

    #[test]
    fn test_container_equality() {
        let a = Item::tuple([Item::uint8(1), Item::string("x")]);
        let b = Item::tuple([Item::uint64(1), Item::bytes(b"x".to_vec())]);
        assert_eq!(a, b);

        // same elements, different container kind
        assert_ne!(
            Item::array([Item::uint8(1)]),
            Item::array_k([Item::uint8(1)])
        );
        assert_ne!(
            Item::tuple([Item::uint8(1)]),
            Item::tuple([Item::uint8(1), Item::uint8(2)])
        );
    }

    #[test]
    fn test_array_k_exact() {
        assert!(Item::array_k_exact(2, [Item::uint8(1), Item::uint8(2)]).is_ok());
        let err = Item::array_k_exact(3, [Item::uint8(1)]).unwrap_err();
        assert_eq!(
            err,
            CodecError::ArityMismatch {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn test_schema_of() {
        let item = Item::tuple([
            Item::uint8(42),
            Item::array([Item::string("foo"), Item::string("bar")]),
            Item::array_k([Item::bool(true), Item::bool(false)]),
        ]);
        assert_eq!(
            item.schema(),
            Schema::tuple([
                Schema::Static,
                Schema::array(Schema::Dynamic),
                Schema::array_k(2, Schema::Static),
            ])
        );
        assert_eq!(Item::array([]).schema(), Schema::array(Schema::Static));
    }

    #[test]
    fn test_empty_fixed_list_is_static() {
        let empty = Item::array_k([]);
        assert!(!empty.is_dynamic());
        assert_eq!(empty.schema(), Schema::array_k(0, Schema::Static));
        assert!(!empty.schema().is_dynamic());
        assert!(Schema::array_k(0, Schema::Dynamic).is_dynamic());

        let value = Item::tuple([empty, Item::string("x")]);
        let data = crate::codec::encode(&value);
        let (got, consumed) = crate::codec::decode(&data, &value.schema()).unwrap();
        assert_eq!(got, value);
        assert_eq!(consumed, data.len());
    }

    #[test]
    fn test_check() {
        let schema = Schema::tuple([Schema::Static, Schema::Dynamic]);
        assert!(Item::tuple([Item::uint8(1), Item::string("a")])
            .check(&schema)
            .is_ok());
        assert!(matches!(
            Item::tuple([Item::uint8(1)]).check(&schema),
            Err(CodecError::ArityMismatch {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            Item::tuple([Item::string("a"), Item::string("b")]).check(&schema),
            Err(CodecError::ShapeMismatch {
                expected: "static",
                found: "string"
            })
        ));
    }

    #[test]
    fn test_serde_shape() {
        let item = Item::tuple([Item::uint8(7), Item::bytes(vec![0xab, 0xcd])]);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"tuple","value":[{"kind":"uint","value":{"value":7,"bits":8}},{"kind":"bytes","value":"abcd"}]}"#
        );
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
