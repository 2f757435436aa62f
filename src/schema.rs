//! Struct types: the immutable, shareable result of parsing a format string or field map.

use std::{
    fmt,
    io::{Read, Seek},
    ops::Range,
    sync::Arc,
};

use indexmap::IndexMap;
use log::{debug, warn};

use crate::{
    codec,
    errors::{EncodeError, RecordError, SchemaError, SourceError},
    field::FieldLayout,
    field_map::{self, FieldMap, FieldSpec},
    format,
    layout::Layout,
    record::Record,
    source::{DecodeMode, Source},
    value::Value,
};

/// Display name used when a struct type was not given one.
pub const DEFAULT_NAME: &str = "struct";

/// How integers are rendered by [Record::to_table] and `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InspectMode {
    #[default]
    Hex,
    Dec,
}

#[derive(Debug)]
struct Inner {
    name: Option<String>,
    fields: Vec<FieldLayout>,
    padding: Vec<Range<usize>>,
    size: usize,
    format: String,
    inspect: InspectMode,
}

/// A compiled binary layout. Cloning is cheap; clones share the same layout.
///
/// Build one with [StructBuilder], [StructType::from_format] or [StructType::from_fields],
/// then [decode](StructType::decode) bytes into [Record]s and [encode](StructType::encode)
/// them back.
#[derive(Clone)]
pub struct StructType(Arc<Inner>);

impl StructType {
    fn from_layout(layout: Layout, name: Option<String>, inspect: InspectMode) -> Self {
        debug!(
            "defined {} ({} bytes, {} fields)",
            name.as_deref().unwrap_or(DEFAULT_NAME),
            layout.size,
            layout.fields.len()
        );

        StructType(Arc::new(Inner {
            name,
            fields: layout.fields,
            padding: layout.padding,
            size: layout.size,
            format: layout.format,
            inspect,
        }))
    }

    /// Defines a struct from a format string. See [StructBuilder::names] for naming rules.
    pub fn from_format<S: AsRef<str>>(fmt: &str, names: &[S]) -> Result<Self, SchemaError> {
        StructBuilder::new().format(fmt).names(names).build()
    }

    /// Defines a struct from a field map with default options.
    pub fn from_fields(fields: FieldMap) -> Result<Self, SchemaError> {
        StructBuilder::new().fields(fields).build()
    }

    /// Total size in bytes, including padding.
    pub fn size(&self) -> usize {
        self.0.size
    }

    /// Display name, `"struct"` when none was given.
    pub fn name(&self) -> &str {
        self.0.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Pack-style description of the layout. Format-string structs keep their original string.
    pub fn format(&self) -> &str {
        &self.0.format
    }

    pub fn inspect_mode(&self) -> InspectMode {
        self.0.inspect
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldLayout] {
        &self.0.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.0.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.fields.iter().map(|f| f.name.as_str())
    }

    /// Byte ranges covered by no field.
    pub fn padding(&self) -> &[Range<usize>] {
        &self.0.padding
    }

    /// A record with every field set to its zero value.
    pub fn new_default(&self) -> Record {
        let values = self
            .fields()
            .iter()
            .map(|f| (f.name.clone(), codec::default_value(f)))
            .collect();
        Record::from_parts(self.clone(), values, None)
    }

    /// A zero-valued record with the named fields overridden.
    pub fn new_from<K, V, I>(&self, values: I) -> Result<Record, RecordError>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = self.new_default();
        for (name, value) in values {
            record.set(name.as_ref(), value)?;
        }
        Ok(record)
    }

    /// Decodes a record from an in-memory buffer.
    ///
    /// Decoding is lenient: a buffer shorter than [size](StructType::size) logs a warning and
    /// the missing fields decode as [Value::None]. Bytes past `size` are ignored.
    pub fn decode(&self, data: &[u8]) -> Record {
        if data.len() < self.size() {
            warn!("{} wants {} bytes, got {}", self.name(), self.size(), data.len());
        }
        codec::decode_record(self, data, None)
    }

    /// Reads exactly `size` bytes (fewer at end of stream) and decodes them leniently,
    /// recording the stream position in [Record::source_offset].
    pub fn read<R: Read + Seek>(&self, reader: &mut R) -> Result<Record, SourceError> {
        self.read_with(Source::Stream(reader), DecodeMode::Lenient)
    }

    /// Decodes from any [Source] with an explicit short-read policy.
    pub fn read_with(&self, source: Source<'_>, mode: DecodeMode) -> Result<Record, SourceError> {
        let (data, offset) = source.fetch(self.size())?;

        if data.len() < self.size() {
            match mode {
                DecodeMode::Strict => {
                    return Err(SourceError::ShortRead {
                        want: self.size(),
                        got: data.len(),
                    });
                }
                DecodeMode::Lenient => {
                    warn!("{} wants {} bytes, got {}", self.name(), self.size(), data.len());
                }
            }
        }

        Ok(codec::decode_record(self, &data, offset))
    }

    /// Encodes a record into exactly [size](StructType::size) bytes.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>, EncodeError> {
        codec::encode_values(self, record.values())
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.size == other.0.size
                && self.0.fields == other.0.fields
                && self.0.padding == other.0.padding)
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name())
            .field("size", &self.size())
            .field("format", &self.format())
            .finish()
    }
}

#[derive(Debug, Clone)]
enum Definition {
    Format(String),
    Fields(FieldMap),
}

/// Configuration for defining a [StructType].
///
/// Exactly one layout source is used: whichever of [format](StructBuilder::format) or
/// [fields](StructBuilder::fields)/[field](StructBuilder::field) was called last.
#[derive(Debug, Clone, Default)]
pub struct StructBuilder {
    definition: Option<Definition>,
    names: Vec<String>,
    rename: Vec<(String, String)>,
    size: Option<usize>,
    name: Option<String>,
    inspect: InspectMode,
}

impl StructBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a pack-style format string as the layout.
    pub fn format(mut self, fmt: &str) -> Self {
        self.definition = Some(Definition::Format(fmt.to_string()));
        self
    }

    /// Field names for a format string.
    ///
    /// Each name claims one whole token, so a repeated numeric token such as `L3` becomes a
    /// single three-element field. Tokens left without a name are split per scalar and named
    /// after their hex offset (`f0`, `f4`, ...). Skip tokens never take a name.
    pub fn names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// Renames a field of a format-string layout after naming.
    pub fn rename(mut self, from: &str, to: &str) -> Self {
        self.rename.push((from.to_string(), to.to_string()));
        self
    }

    /// Uses a field map as the layout.
    pub fn fields(mut self, fields: FieldMap) -> Self {
        self.definition = Some(Definition::Fields(fields));
        self
    }

    /// Appends one entry to the field map, starting a new map if the layout was a format string.
    pub fn field(mut self, name: &str, spec: impl Into<FieldSpec>) -> Self {
        let mut fields = match self.definition.take() {
            Some(Definition::Fields(fields)) => fields,
            _ => IndexMap::new(),
        };
        fields.insert(name.to_string(), spec.into());
        self.definition = Some(Definition::Fields(fields));
        self
    }

    /// Forces the total size. Must be at least the extent of all fields.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Display name used by `Display` and [Record::to_table].
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn inspect(mut self, inspect: InspectMode) -> Self {
        self.inspect = inspect;
        self
    }

    pub fn build(self) -> Result<StructType, SchemaError> {
        let layout = match &self.definition {
            Some(Definition::Format(fmt)) => {
                format::parse_format(fmt, &self.names, &self.rename, self.size)?
            }
            Some(Definition::Fields(fields)) => field_map::parse_fields(fields, self.size)?,
            None => return Err(SchemaError::MissingSchema),
        };

        Ok(StructType::from_layout(layout, self.name, self.inspect))
    }
}
