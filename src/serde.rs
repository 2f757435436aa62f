//! Serde-deserializable struct definitions.
//!
//! A [SchemaDef] describes several struct types at once, typically loaded from a JSON file
//! shipped next to the binary data it describes:
//!
//! ```json
//! {
//!   "Point": { "fields": { "x": "int", "y": "int" } },
//!   "Rect":  { "fields": { "tl": "Point", "br": { "type": "Point", "offset": 16 } }, "name": "Rect" },
//!   "Header": { "format": "A4 N n", "names": ["magic", "len"] }
//! }
//! ```
//!
//! A field type naming a struct defined earlier in the same schema nests that struct.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    errors::SchemaError,
    field_map::{FieldMap, FieldSpec, TypeRef},
    schema::{InspectMode, StructBuilder, StructType},
};

/// An ordered set of named struct definitions.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(transparent)]
pub struct SchemaDef {
    pub structs: IndexMap<String, StructDef>,
}

/// One struct, defined by either a format string or a field map.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StructDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Names for the tokens of `format`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// `old name -> new name`, applied to format-string fields.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rename: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, FieldDef>>,
    /// Forced total size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Display name; defaults to `"struct"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub inspect: InspectMode,
}

/// A field map entry: a bare type name, or a type with offset and count.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum FieldDef {
    Type(String),
    Detailed {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        offset: Option<usize>,
        #[serde(default)]
        count: Option<usize>,
    },
}

impl FieldDef {
    fn to_spec(&self, known: &IndexMap<String, StructType>) -> FieldSpec {
        let (ty, offset, count) = match self {
            FieldDef::Type(ty) => (ty, None, None),
            FieldDef::Detailed { ty, offset, count } => (ty, *offset, *count),
        };

        let ty = match known.get(ty) {
            Some(nested) => TypeRef::Struct(nested.clone()),
            None => TypeRef::Named(ty.clone()),
        };

        FieldSpec { ty, offset, count }
    }
}

impl StructDef {
    /// Builds the struct, resolving struct-typed fields against `known`.
    pub fn compile(&self, known: &IndexMap<String, StructType>) -> Result<StructType, SchemaError> {
        let mut builder = StructBuilder::new().inspect(self.inspect);

        if let Some(fields) = &self.fields {
            let map: FieldMap = fields
                .iter()
                .map(|(name, def)| (name.clone(), def.to_spec(known)))
                .collect();
            builder = builder.fields(map);
        } else if let Some(fmt) = &self.format {
            builder = builder.format(fmt).names(&self.names);
            for (from, to) in &self.rename {
                builder = builder.rename(from, to);
            }
        }

        if let Some(size) = self.size {
            builder = builder.size(size);
        }
        if let Some(name) = &self.name {
            builder = builder.name(name);
        }

        builder.build()
    }
}

impl SchemaDef {
    /// Compiles every definition in order.
    pub fn compile(&self) -> Result<IndexMap<String, StructType>, SchemaError> {
        let mut compiled = IndexMap::new();
        for (key, def) in &self.structs {
            let ty = def.compile(&compiled)?;
            compiled.insert(key.clone(), ty);
        }
        Ok(compiled)
    }
}
