//! Recursive decode and encode of field values.
//!
//! Decoding never fails: any part of a field that lies past the end of the data decodes as
//! [Value::None] (numbers) or a shortened string. Encoding starts from a zeroed buffer of the
//! struct size, so padding and absent values come out as zero bytes.

use indexmap::IndexMap;

use crate::{
    bytes,
    catalog::{Kind, TypeSpec},
    errors::EncodeError,
    field::{FieldLayout, FieldType},
    record::Record,
    schema::StructType,
    value::Value,
};

/// Clamps `start..end` to the available data.
fn window(data: &[u8], start: usize, end: usize) -> &[u8] {
    let len = data.len();
    &data[start.min(len)..end.min(len)]
}

pub fn decode_record(ty: &StructType, data: &[u8], offset: Option<u64>) -> Record {
    let values = ty
        .fields()
        .iter()
        .map(|field| (field.name.clone(), decode_field(field, data)))
        .collect();

    Record::from_parts(ty.clone(), values, offset)
}

fn decode_field(field: &FieldLayout, data: &[u8]) -> Value {
    let data = window(data, field.offset, field.offset + field.size);

    match &field.ty {
        FieldType::Primitive(spec) if spec.kind.is_numeric() => {
            if field.is_array() {
                let items = (0..field.count)
                    .map(|i| decode_number(spec, window(data, i * spec.width, (i + 1) * spec.width)))
                    .collect();
                Value::Array(items)
            } else {
                decode_number(spec, data)
            }
        }
        FieldType::Primitive(spec) => decode_string(spec, data),
        FieldType::Struct(nested) => {
            if field.is_array() {
                let size = nested.size();
                let items = (0..field.count)
                    .map(|i| {
                        let chunk = window(data, i * size, (i + 1) * size);
                        Value::Record(decode_record(nested, chunk, None))
                    })
                    .collect();
                Value::Array(items)
            } else {
                Value::Record(decode_record(nested, data, None))
            }
        }
    }
}

fn decode_number(spec: &TypeSpec, data: &[u8]) -> Value {
    let value = match spec.kind {
        Kind::Unsigned => bytes::read_uint(data, spec.width, spec.endian).map(Value::UInt),
        Kind::Signed => bytes::read_int(data, spec.width, spec.endian).map(Value::Int),
        Kind::Float if spec.width == 4 => bytes::read_f32(data, spec.endian).map(Value::Float32),
        Kind::Float => bytes::read_f64(data, spec.endian).map(Value::Float),
        _ => None,
    };

    value.unwrap_or(Value::None)
}

fn decode_string(spec: &TypeSpec, data: &[u8]) -> Value {
    match spec.kind {
        Kind::Raw => Value::Bytes(data.to_vec()),
        Kind::Padded => Value::Bytes(bytes::strip_padded(data).to_vec()),
        Kind::NulTerminated => Value::Bytes(bytes::strip_nul(data).to_vec()),
        Kind::Hex(order) => Value::Str(bytes::to_hex(data, order)),
        _ => Value::None,
    }
}

/// Zero value of a field, as used by [StructType::new_default].
pub fn default_value(field: &FieldLayout) -> Value {
    let element = match &field.ty {
        FieldType::Primitive(spec) => match spec.kind {
            Kind::Unsigned => Value::UInt(0),
            Kind::Signed => Value::Int(0),
            Kind::Float if spec.width == 4 => Value::Float32(0.0),
            Kind::Float => Value::Float(0.0),
            Kind::Hex(_) => Value::Str(String::new()),
            Kind::Raw | Kind::Padded | Kind::NulTerminated => Value::Bytes(Vec::new()),
            Kind::Skip => Value::None,
        },
        FieldType::Struct(nested) => Value::Record(nested.new_default()),
    };

    if field.is_array() {
        Value::Array(vec![element; field.count])
    } else {
        element
    }
}

pub fn encode_values(
    ty: &StructType,
    values: &IndexMap<String, Value>,
) -> Result<Vec<u8>, EncodeError> {
    let mut buf = vec![0u8; ty.size()];

    for field in ty.fields() {
        let value = values.get(&field.name).unwrap_or(&Value::None);
        encode_field(field, value, &mut buf[field.extent()])?;
    }

    Ok(buf)
}

fn encode_field(field: &FieldLayout, value: &Value, buf: &mut [u8]) -> Result<(), EncodeError> {
    if value.is_none() {
        return Ok(());
    }

    match &field.ty {
        FieldType::Primitive(spec) if spec.kind.is_numeric() => {
            if field.is_array() {
                let items = array_items(field, value)?;
                for (chunk, item) in buf.chunks_exact_mut(spec.width).zip(items) {
                    encode_number(field, spec, item, chunk)?;
                }
                Ok(())
            } else {
                encode_number(field, spec, value, buf)
            }
        }
        FieldType::Primitive(spec) => encode_string(field, spec, value, buf),
        FieldType::Struct(nested) => {
            if field.is_array() {
                let items = array_items(field, value)?;
                if nested.size() == 0 {
                    return Ok(());
                }
                for (chunk, item) in buf.chunks_exact_mut(nested.size()).zip(items) {
                    encode_nested(field, nested, item, chunk)?;
                }
                Ok(())
            } else {
                encode_nested(field, nested, value, buf)
            }
        }
    }
}

fn array_items<'v>(field: &FieldLayout, value: &'v Value) -> Result<&'v [Value], EncodeError> {
    value.as_array().ok_or_else(|| EncodeError::TypeMismatch {
        field: field.name.clone(),
        expected: "an array",
    })
}

fn encode_number(
    field: &FieldLayout,
    spec: &TypeSpec,
    value: &Value,
    buf: &mut [u8],
) -> Result<(), EncodeError> {
    match (spec.kind, value) {
        (_, Value::None) => {}
        (Kind::Float, Value::Float32(x)) if spec.width == 4 => {
            bytes::write_f32(buf, *x, spec.endian)
        }
        (Kind::Float, _) => {
            let x = to_float(value).ok_or_else(|| EncodeError::TypeMismatch {
                field: field.name.clone(),
                expected: "a float",
            })?;
            if spec.width == 4 {
                bytes::write_f32(buf, x as f32, spec.endian);
            } else {
                bytes::write_f64(buf, x, spec.endian);
            }
        }
        (_, Value::UInt(n)) => bytes::write_uint(buf, *n, spec.endian),
        (_, Value::Int(n)) => bytes::write_uint(buf, *n as u64, spec.endian),
        _ => {
            return Err(EncodeError::TypeMismatch {
                field: field.name.clone(),
                expected: "an integer",
            });
        }
    }

    Ok(())
}

fn to_float(value: &Value) -> Option<f64> {
    match *value {
        Value::Float32(x) => Some(x as f64),
        Value::Float(x) => Some(x),
        Value::UInt(n) => Some(n as f64),
        Value::Int(n) => Some(n as f64),
        _ => None,
    }
}

fn encode_string(
    field: &FieldLayout,
    spec: &TypeSpec,
    value: &Value,
    buf: &mut [u8],
) -> Result<(), EncodeError> {
    if let Kind::Hex(order) = spec.kind {
        let digits = value.as_str().ok_or_else(|| EncodeError::TypeMismatch {
            field: field.name.clone(),
            expected: "a hex string",
        })?;
        return bytes::hex_into(buf, digits, order).map_err(|source| EncodeError::InvalidHex {
            field: field.name.clone(),
            source,
        });
    }

    let data = value.as_bytes().ok_or_else(|| EncodeError::TypeMismatch {
        field: field.name.clone(),
        expected: "a string",
    })?;

    let fill = match spec.kind {
        Kind::Padded => b' ',
        _ => 0,
    };
    bytes::pad_into(buf, data, fill);

    Ok(())
}

fn encode_nested(
    field: &FieldLayout,
    nested: &StructType,
    value: &Value,
    buf: &mut [u8],
) -> Result<(), EncodeError> {
    match value {
        Value::None => Ok(()),
        Value::Record(record) if record.struct_type() == nested => {
            buf.copy_from_slice(&record.encode()?);
            Ok(())
        }
        Value::Record(_) => Err(EncodeError::StructMismatch {
            field: field.name.clone(),
        }),
        _ => Err(EncodeError::TypeMismatch {
            field: field.name.clone(),
            expected: "a record",
        }),
    }
}
