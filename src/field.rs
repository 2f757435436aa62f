//! Placed fields of a [crate::StructType].

use crate::{
    catalog::{Kind, TypeSpec},
    schema::StructType,
};

/// What a field holds: a primitive from the catalog or another struct type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Primitive(TypeSpec),
    Struct(StructType),
}

impl FieldType {
    /// Size of a single element in bytes.
    pub fn element_size(&self) -> usize {
        match self {
            FieldType::Primitive(spec) => spec.width,
            FieldType::Struct(ty) => ty.size(),
        }
    }
}

/// A named field placed at a byte offset.
///
/// For numeric primitives and nested structs `count` is the number of elements and
/// `size == element_size * count`; a field with `count != 1` holds a sequence. For string and
/// hex primitives `count` is always 1 and `size` is the extent of the single string.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    /// Name used for by-name access in a [crate::Record].
    pub name: String,
    pub ty: FieldType,
    /// Total extent in bytes.
    pub size: usize,
    /// Offset from the start of the struct.
    pub offset: usize,
    pub count: usize,
}

impl FieldLayout {
    /// Byte range `[offset, offset + size)` covered by this field.
    pub fn extent(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.size
    }

    /// True if values of this field are sequences.
    pub fn is_array(&self) -> bool {
        self.count != 1
    }

    /// Pack token describing the whole extent, as used in a struct's format string.
    pub fn token(&self) -> String {
        match &self.ty {
            FieldType::Primitive(spec) if spec.kind.is_numeric() && self.count == 1 => {
                spec.token_str()
            }
            FieldType::Primitive(TypeSpec {
                kind: Kind::Hex(_),
                token,
                ..
            }) => format!("{}{}", token, self.size * 2),
            FieldType::Primitive(TypeSpec {
                kind: Kind::Padded | Kind::NulTerminated,
                token,
                ..
            }) => format!("{}{}", token, self.size),
            _ => format!("a{}", self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn primitive(name: &str, token: &str, offset: usize, count: usize, size: usize) -> FieldLayout {
        FieldLayout {
            name: name.to_string(),
            ty: FieldType::Primitive(catalog::resolve(token).unwrap()),
            size,
            offset,
            count,
        }
    }

    #[test]
    fn test_extent() {
        let field = primitive("x", "L", 4, 1, 4);
        assert_eq!(field.extent(), 4..8);
        assert!(!field.is_array());
    }

    #[test]
    fn test_token() {
        assert_eq!(primitive("x", "S>", 0, 1, 2).token(), "S>");
        assert_eq!(primitive("a", "i", 0, 3, 12).token(), "a12");
        assert_eq!(primitive("s", "Z", 0, 1, 8).token(), "Z8");
        assert_eq!(primitive("h", "h", 0, 1, 2).token(), "h4");
    }
}
