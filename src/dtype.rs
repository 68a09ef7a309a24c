//! Tensor element data types.
//!
//! A [`DataType`] is a `(code, bits, lanes)` triple in the DLPack style:
//! `float32` is `(Float, 32, 1)`, and a vectorized `uint8x4` is
//! `(UInt, 8, 4)`. The layer below never interprets these values; they exist
//! so tensor types can be compared and printed.

use serde::{Deserialize, Serialize};

/// The scalar category of a [`DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCode {
    Int,
    UInt,
    Float,
    BFloat,
}

impl TypeCode {
    fn prefix(self) -> &'static str {
        match self {
            TypeCode::Int => "int",
            TypeCode::UInt => "uint",
            TypeCode::Float => "float",
            TypeCode::BFloat => "bfloat",
        }
    }
}

/// A tensor element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    pub code: TypeCode,
    pub bits: u8,
    pub lanes: u16,
}

impl DataType {
    pub const fn new(code: TypeCode, bits: u8, lanes: u16) -> Self {
        DataType { code, bits, lanes }
    }

    pub const fn int(bits: u8) -> Self {
        Self::new(TypeCode::Int, bits, 1)
    }

    pub const fn uint(bits: u8) -> Self {
        Self::new(TypeCode::UInt, bits, 1)
    }

    pub const fn float(bits: u8) -> Self {
        Self::new(TypeCode::Float, bits, 1)
    }

    /// A boolean, conventionally a 1-bit unsigned integer.
    pub const fn bool_() -> Self {
        Self::uint(1)
    }

    pub const fn int32() -> Self {
        Self::int(32)
    }

    pub const fn int64() -> Self {
        Self::int(64)
    }

    pub const fn uint8() -> Self {
        Self::uint(8)
    }

    pub const fn float32() -> Self {
        Self::float(32)
    }

    pub const fn float64() -> Self {
        Self::float(64)
    }

    pub const fn bfloat16() -> Self {
        Self::new(TypeCode::BFloat, 16, 1)
    }

    pub const fn with_lanes(self, lanes: u16) -> Self {
        Self::new(self.code, self.bits, lanes)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.code.prefix(), self.bits)?;

        if self.lanes > 1 {
            write!(f, "x{}", self.lanes)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DataType;

    #[test]
    fn scalar_display() {
        assert_eq!(DataType::float32().to_string(), "float32");
        assert_eq!(DataType::int64().to_string(), "int64");
        assert_eq!(DataType::bool_().to_string(), "uint1");
        assert_eq!(DataType::bfloat16().to_string(), "bfloat16");
    }

    #[test]
    fn vector_display() {
        assert_eq!(DataType::uint8().with_lanes(4).to_string(), "uint8x4");
    }
}
