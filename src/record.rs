//! Records: one decoded or constructed instance of a [StructType].

use std::ops::Index;

use indexmap::IndexMap;

use crate::{
    errors::{EncodeError, RecordError},
    schema::StructType,
    value::Value,
};

/// Field values of one struct instance, in declaration order.
///
/// Every field of the struct type is always present; absent data is [Value::None].
#[derive(Debug, Clone)]
pub struct Record {
    ty: StructType,
    values: IndexMap<String, Value>,
    offset: Option<u64>,
}

impl Record {
    pub(crate) fn from_parts(
        ty: StructType,
        values: IndexMap<String, Value>,
        offset: Option<u64>,
    ) -> Self {
        Record { ty, values, offset }
    }

    pub fn struct_type(&self) -> &StructType {
        &self.ty
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    /// Replaces the value of an existing field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Stream position the record was read from; `None` for buffers and constructed records.
    pub fn source_offset(&self) -> Option<u64> {
        self.offset
    }

    /// Encodes into exactly `struct_type().size()` bytes.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        self.ty.encode(self)
    }

    /// True if every field is zero, absent or a NUL-only string. Nested records and arrays
    /// count as empty when all their elements do.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(Value::is_blank)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.values == other.values
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// Panics if the field does not exist.
    #[track_caller]
    fn index(&self, name: &str) -> &Value {
        match self.values.get(name) {
            Some(value) => value,
            None => panic!("no field named {:?} in {}", name, self.ty.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructBuilder;

    fn struct_type() -> StructType {
        StructType::from_format("L S", &["a", "b"]).unwrap()
    }

    #[test]
    fn test_set_and_get() {
        let mut record = struct_type().new_default();
        record.set("a", 0x12345678u32).unwrap();
        assert_eq!(record.get("a"), Some(&Value::UInt(0x12345678)));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_set_unknown_field() {
        let mut record = struct_type().new_default();
        assert_eq!(
            record.set("c", 1u8).unwrap_err(),
            RecordError::UnknownField("c".to_string())
        );
    }

    #[test]
    fn test_fields_in_order() {
        let record = struct_type().new_from([("b", 2u16)]).unwrap();
        let fields: Vec<(&str, &Value)> = record.fields().collect();
        assert_eq!(fields, vec![("a", &Value::UInt(0)), ("b", &Value::UInt(2))]);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_is_empty_zeros() {
        let record = struct_type().new_from([("a", 0u32), ("b", 0)]).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_is_empty_absent() {
        let record = struct_type().decode(&[]);
        assert_eq!(record["a"], Value::None);
        assert!(record.is_empty());
    }

    #[test]
    fn test_not_empty_with_non_zero() {
        let record = struct_type().new_from([("a", 1u32), ("b", 0)]).unwrap();
        assert!(!record.is_empty());
    }

    #[test]
    fn test_is_empty_strings() {
        let ty = StructType::from_format("a4", &["name"]).unwrap();
        assert!(ty.new_from([("name", "\0\0\0\0")]).unwrap().is_empty());
        assert!(!ty.new_from([("name", "test")]).unwrap().is_empty());
    }

    #[test]
    fn test_is_empty_nested() {
        let point = StructType::from_format("ll", &["x", "y"]).unwrap();
        let line = StructBuilder::new()
            .field("from", &point)
            .field("to", &point)
            .build()
            .unwrap();

        let mut record = line.new_default();
        assert!(record.is_empty());

        let mut to = point.new_default();
        to.set("y", -3i32).unwrap();
        record.set("to", to).unwrap();
        assert!(!record.is_empty());
    }

    #[test]
    #[should_panic(expected = "no field named")]
    fn test_index_unknown_panics() {
        let record = struct_type().new_default();
        let _ = &record["nope"];
    }
}
