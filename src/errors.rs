//! Error types for struct definition, decoding, encoding and record access.

use std::io;

use thiserror::Error;

/// Errors produced while building a [crate::StructType] from a format string or a field map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Format letter or type alias is not in the catalog.
    #[error("unknown field type {0:?}")]
    UnknownFieldType(String),
    /// Explicit offset points before the end of the previous field.
    #[error("field {field:?} overlaps previous field {previous:?}")]
    OverlappingField { field: String, previous: String },
    /// Fields extend past the forced struct size.
    #[error("actual struct size {actual} is greater than forced size {forced}")]
    SizeOverflow { actual: usize, forced: usize },
    /// Neither a format string nor a field map was given.
    #[error("no format string and no field map given")]
    MissingSchema,
    /// Two fields ended up with the same name.
    #[error("duplicate field name {0:?}")]
    DuplicateField(String),
    /// Hex tokens count hex digits, so the count must be even.
    #[error("hex token {token:?} has odd digit count {count}")]
    OddHexCount { token: char, count: usize },
    /// More names were supplied than the format string has fields.
    #[error("format has {expected} named fields but {given} names were given")]
    TooManyNames { expected: usize, given: usize },
    /// A field, padding run or forced size pushes the struct past the largest allocatable size.
    #[error("{0:?} does not fit in a struct layout")]
    LayoutTooLarge(String),
    /// The struct would hold more fields than a layout allows.
    #[error("struct has more than {limit} fields")]
    TooManyFields { limit: usize },
    /// Rename table refers to a field that does not exist.
    #[error("cannot rename unknown field {0:?}")]
    UnknownRename(String),
}

/// Errors produced when acquiring bytes for a decode.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The byte source cannot be read from.
    #[error("byte source does not support reading")]
    Unsupported,
    /// The byte source failed while reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Source ended before a full struct was read. Only raised by [crate::DecodeMode::Strict].
    #[error("wanted {want} bytes, got {got}")]
    ShortRead { want: usize, got: usize },
}

/// Errors produced when encoding a [crate::Record] back to bytes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Value variant cannot be stored in the field.
    #[error("field {field:?} expects {expected}")]
    TypeMismatch { field: String, expected: &'static str },
    /// Hex string field holds a non-hex character.
    #[error("field {field:?} holds an invalid hex string: {source}")]
    InvalidHex {
        field: String,
        #[source]
        source: hex::FromHexError,
    },
    /// Nested record was built from a different struct type than the field declares.
    #[error("field {field:?} holds a record of a different struct type")]
    StructMismatch { field: String },
}

/// Errors produced by by-name record access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// No field with this name exists in the struct type.
    #[error("no field named {0:?}")]
    UnknownField(String),
}
