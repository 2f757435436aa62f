//! Fixed-layout binary structs described by pack-style format strings or ordered field maps.
//!
//! A [StructType] is compiled once and then decodes byte buffers or streams into [Record]s,
//! which encode back to the same bytes.
//!
//! ```
//! use structpack::{FieldSpec, StructBuilder, StructType, Value};
//!
//! let header = StructType::from_format("A4 N n", &["magic", "len", "flags"]).unwrap();
//! let record = header.decode(b"RIFF\x00\x00\x01\x00\x00\x07");
//! assert_eq!(record["magic"], Value::from("RIFF"));
//! assert_eq!(record["len"], Value::UInt(256));
//! assert_eq!(record.encode().unwrap(), b"RIFF\x00\x00\x01\x00\x00\x07");
//!
//! let table = StructBuilder::new()
//!     .name("Table")
//!     .field("count", "uint16_le")
//!     .field("entries", FieldSpec::new(&header).count(2).at(4))
//!     .build()
//!     .unwrap();
//! assert_eq!(table.size(), 24);
//! ```

pub mod bytes;
pub mod catalog;
mod codec;
pub mod errors;
pub mod field;
pub mod field_map;
pub mod format;
mod inspect;
pub mod layout;
pub mod record;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod source;
pub mod value;

pub use errors::{EncodeError, RecordError, SchemaError, SourceError};
pub use field::{FieldLayout, FieldType};
pub use field_map::{FieldMap, FieldSpec, TypeRef};
pub use record::Record;
pub use schema::{InspectMode, StructBuilder, StructType};
pub use source::{DecodeMode, Source, Stream};
pub use value::Value;
