//! Human-readable rendering of records.
//!
//! `Display` prints a compact `<Name a=1 b="text">` form. [Record::to_table] right-aligns
//! every integer in a column as wide as the largest value of its type, so records of the
//! same struct line up when printed one per line.

use std::fmt;

use crate::{
    bytes::width_mask,
    catalog::TypeSpec,
    field::FieldType,
    record::Record,
    schema::InspectMode,
    value::Value,
};

fn render(value: &Value, mode: InspectMode) -> String {
    match value {
        Value::None => "nil".to_string(),
        Value::UInt(n) => match mode {
            InspectMode::Hex => format!("{:#x}", n),
            InspectMode::Dec => n.to_string(),
        },
        Value::Int(n) => match mode {
            InspectMode::Hex if *n < 0 => format!("-{:#x}", n.unsigned_abs()),
            InspectMode::Hex => format!("{:#x}", n),
            InspectMode::Dec => n.to_string(),
        },
        Value::Float32(x) => x.to_string(),
        Value::Float(x) => x.to_string(),
        Value::Bytes(b) => format!("\"{}\"", b.escape_ascii()),
        Value::Str(s) => format!("{:?}", s),
        Value::Record(r) => r.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(|v| render(v, mode)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

/// Column width for a numeric primitive: hex digits, or decimal digits plus sign.
fn column_width(spec: &TypeSpec, mode: InspectMode) -> usize {
    match mode {
        InspectMode::Hex => spec.width * 2,
        InspectMode::Dec => match spec.width {
            1 => 4,
            2 => 6,
            4 => 11,
            _ => 20,
        },
    }
}

fn cell(spec: &TypeSpec, value: &Value, mode: InspectMode) -> String {
    let text = match (value, mode) {
        (Value::None, _) => "0".to_string(),
        (Value::UInt(n), InspectMode::Hex) => format!("{:x}", n),
        (Value::Int(n), InspectMode::Hex) => format!("{:x}", (*n as u64) & width_mask(spec.width)),
        (Value::UInt(n), InspectMode::Dec) => n.to_string(),
        (Value::Int(n), InspectMode::Dec) => n.to_string(),
        (Value::Float32(x), _) => format!("{:.3}", x),
        (Value::Float(x), _) => format!("{:.3}", x),
        (other, _) => render(other, mode),
    };

    format!("{:>width$}", text, width = column_width(spec, mode))
}

impl Record {
    /// Renders the record with fixed-width integer columns.
    ///
    /// ```
    /// use structpack::{InspectMode, StructBuilder};
    ///
    /// let ty = StructBuilder::new().format("C S").inspect(InspectMode::Dec).build().unwrap();
    /// assert_eq!(ty.new_default().to_table(), "<struct f0=   0 f1=     0>");
    /// ```
    pub fn to_table(&self) -> String {
        let ty = self.struct_type();
        let mode = ty.inspect_mode();

        let columns: Vec<String> = ty
            .fields()
            .iter()
            .map(|field| {
                let value = self.get(&field.name).unwrap_or(&Value::None);
                let text = match (&field.ty, value) {
                    (FieldType::Primitive(spec), Value::Array(items)) if spec.kind.is_numeric() => {
                        let items: Vec<String> =
                            items.iter().map(|v| cell(spec, v, mode)).collect();
                        format!("[{}]", items.join(" "))
                    }
                    (FieldType::Primitive(spec), _) if spec.kind.is_numeric() => {
                        cell(spec, value, mode)
                    }
                    (_, Value::Record(r)) => r.to_table(),
                    _ => render(value, mode),
                };
                format!("{}={}", field.name, text)
            })
            .collect();

        format!("<{} {}>", ty.name(), columns.join(" "))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = self.struct_type().inspect_mode();
        write!(f, "<{}", self.struct_type().name())?;
        for (name, value) in self.fields() {
            write!(f, " {}={}", name, render(value, mode))?;
        }
        write!(f, ">")
    }
}
