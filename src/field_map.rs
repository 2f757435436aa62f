//! Declarative field maps: an ordered map from field name to type, offset and count.

use indexmap::IndexMap;

use crate::{
    catalog::{self, Kind},
    errors::SchemaError,
    field::FieldType,
    layout::{Layout, LayoutBuilder},
    schema::StructType,
};

/// The type half of a [FieldSpec]: a catalog name or a nested struct.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// C-style alias (`"uint32_t"`) or pack token (`"N"`, `"S>"`, `"A"`).
    Named(String),
    Struct(StructType),
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        TypeRef::Named(value.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        TypeRef::Named(value)
    }
}

impl From<StructType> for TypeRef {
    fn from(value: StructType) -> Self {
        TypeRef::Struct(value)
    }
}

impl From<&StructType> for TypeRef {
    fn from(value: &StructType) -> Self {
        TypeRef::Struct(value.clone())
    }
}

/// One entry of a field map.
///
/// `offset` defaults to the end of the previous field. `count` turns numeric and struct types
/// into fixed-length arrays; for string and hex tokens it is the extent, as in format strings.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub ty: TypeRef,
    pub offset: Option<usize>,
    pub count: Option<usize>,
}

impl FieldSpec {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        FieldSpec {
            ty: ty.into(),
            offset: None,
            count: None,
        }
    }

    /// Places the field at an explicit byte offset.
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the element count (or string extent).
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl From<&str> for FieldSpec {
    fn from(value: &str) -> Self {
        FieldSpec::new(value)
    }
}

impl From<String> for FieldSpec {
    fn from(value: String) -> Self {
        FieldSpec::new(value)
    }
}

impl From<StructType> for FieldSpec {
    fn from(value: StructType) -> Self {
        FieldSpec::new(value)
    }
}

impl From<&StructType> for FieldSpec {
    fn from(value: &StructType) -> Self {
        FieldSpec::new(value)
    }
}

/// Ordered field name to [FieldSpec] map.
pub type FieldMap = IndexMap<String, FieldSpec>;

/// Lays out a field map in declaration order.
pub fn parse_fields(fields: &FieldMap, forced_size: Option<usize>) -> Result<Layout, SchemaError> {
    let mut builder = LayoutBuilder::new();

    for (name, spec) in fields {
        if let Some(offset) = spec.offset {
            builder.seek(name, offset)?;
        }

        let too_large = || SchemaError::LayoutTooLarge(name.clone());

        match &spec.ty {
            TypeRef::Struct(nested) => {
                let count = spec.count.unwrap_or(1);
                let size = nested.size().checked_mul(count).ok_or_else(too_large)?;
                builder.push(name.clone(), FieldType::Struct(nested.clone()), count, size)?;
            }
            TypeRef::Named(type_name) => {
                let prim = catalog::resolve(type_name)?;
                match prim.kind {
                    Kind::Skip => builder.skip(prim.extent(spec.count.unwrap_or(1))?)?,
                    kind if kind.is_numeric() => {
                        let count = spec.count.unwrap_or(1);
                        let size = prim.width.checked_mul(count).ok_or_else(too_large)?;
                        builder.push(name.clone(), FieldType::Primitive(prim), count, size)?;
                    }
                    Kind::Hex(_) => {
                        let size = prim.extent(spec.count.unwrap_or(2))?;
                        builder.push(name.clone(), FieldType::Primitive(prim), 1, size)?;
                    }
                    _ => {
                        let size = prim.extent(spec.count.unwrap_or(1))?;
                        builder.push(name.clone(), FieldType::Primitive(prim), 1, size)?;
                    }
                }
            }
        }
    }

    builder.finish(forced_size)
}
