//! Offset and size assignment shared by the format-string and field-map parsers.

use std::{collections::HashSet, ops::Range};

use log::trace;

use crate::{
    errors::SchemaError,
    field::{FieldLayout, FieldType},
};

/// Largest struct size in bytes. Encoding allocates a buffer of the full size.
pub const MAX_SIZE: usize = isize::MAX as usize;

/// Largest number of fields in one struct.
pub const MAX_FIELDS: usize = 1 << 16;

/// Name reported for padding runs in layout errors.
const PADDING: &str = "<padding>";

/// The output of a [LayoutBuilder]: placed fields, padding gaps and total size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub fields: Vec<FieldLayout>,
    /// Byte ranges not covered by any field. Always encoded as zero.
    pub padding: Vec<Range<usize>>,
    pub size: usize,
    /// Pack-style description of the whole layout.
    pub format: String,
}

/// Places fields one after another, advancing a byte cursor.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    cursor: usize,
    fields: Vec<FieldLayout>,
    padding: Vec<Range<usize>>,
    tokens: Vec<String>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset where the next field will be placed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// End offset after `len` more bytes, if it stays within [MAX_SIZE].
    fn advance(&self, what: &str, len: usize) -> Result<usize, SchemaError> {
        self.cursor
            .checked_add(len)
            .filter(|&end| end <= MAX_SIZE)
            .ok_or_else(|| SchemaError::LayoutTooLarge(what.to_string()))
    }

    /// Inserts `len` bytes of padding at the cursor.
    pub fn skip(&mut self, len: usize) -> Result<(), SchemaError> {
        if len == 0 {
            return Ok(());
        }

        let end = self.advance(PADDING, len)?;
        trace!("padding {:#x}..{:#x}", self.cursor, end);
        self.padding.push(self.cursor..end);
        self.tokens.push(format!("x{}", len));
        self.cursor = end;
        Ok(())
    }

    /// Moves the cursor to an explicit offset for field `name`, padding any gap.
    ///
    /// Fails if `offset` lies before the end of the previous field.
    pub fn seek(&mut self, name: &str, offset: usize) -> Result<(), SchemaError> {
        if offset < self.cursor {
            let previous = self
                .fields
                .iter()
                .rev()
                .find(|f| f.extent().end > offset)
                .or_else(|| self.fields.last())
                .map_or_else(|| PADDING.to_string(), |f| f.name.clone());

            return Err(SchemaError::OverlappingField {
                field: name.to_string(),
                previous,
            });
        }

        self.skip(offset - self.cursor)
    }

    /// Places a field of `count` elements at the cursor and advances past its `size` bytes.
    pub fn push(
        &mut self,
        name: String,
        ty: FieldType,
        count: usize,
        size: usize,
    ) -> Result<(), SchemaError> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(SchemaError::TooManyFields { limit: MAX_FIELDS });
        }
        let end = self.advance(&name, size)?;

        let field = FieldLayout {
            name,
            ty,
            size,
            offset: self.cursor,
            count,
        };

        trace!(
            "field {:?} at {:#x}, {} bytes",
            field.name, field.offset, field.size
        );
        self.tokens.push(field.token());
        self.cursor = end;
        self.fields.push(field);
        Ok(())
    }

    /// Renames an already placed field.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), SchemaError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == from)
            .ok_or_else(|| SchemaError::UnknownRename(from.to_string()))?;

        field.name = to.to_string();
        Ok(())
    }

    /// Finalizes the layout. A forced size must cover every field and becomes the total size.
    pub fn finish(self, forced_size: Option<usize>) -> Result<Layout, SchemaError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        let size = match forced_size {
            Some(forced) if forced > MAX_SIZE => {
                return Err(SchemaError::LayoutTooLarge(format!("size {forced}")));
            }
            Some(forced) if forced < self.cursor => {
                return Err(SchemaError::SizeOverflow {
                    actual: self.cursor,
                    forced,
                });
            }
            Some(forced) => forced,
            None => self.cursor,
        };

        let mut padding = self.padding;
        if size > self.cursor {
            padding.push(self.cursor..size);
        }

        Ok(Layout {
            fields: self.fields,
            padding,
            size,
            format: self.tokens.join(" "),
        })
    }
}
