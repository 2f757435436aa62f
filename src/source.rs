//! Byte sources a struct can be decoded from.

use std::{
    borrow::Cow,
    io::{self, Read, Seek},
};

use crate::errors::SourceError;

/// A readable byte stream that can report its position.
///
/// Implemented for every `Read + Seek` type.
pub trait Stream: Read {
    fn position(&mut self) -> io::Result<u64>;
}

impl<T: Read + Seek + ?Sized> Stream for T {
    fn position(&mut self) -> io::Result<u64> {
        self.stream_position()
    }
}

/// Where decoded bytes come from.
pub enum Source<'a> {
    /// A complete in-memory buffer. Records decoded from it have no source offset.
    Buffer(&'a [u8]),
    /// A stream read sequentially. The position before reading becomes the source offset.
    Stream(&'a mut dyn Stream),
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(value: &'a [u8]) -> Self {
        Source::Buffer(value)
    }
}

/// What to do when a source yields fewer bytes than the struct size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Log a warning and decode the available bytes; missing fields become absent.
    #[default]
    Lenient,
    /// Fail with [SourceError::ShortRead].
    Strict,
}

fn map_io(err: io::Error) -> SourceError {
    match err.kind() {
        io::ErrorKind::Unsupported => SourceError::Unsupported,
        _ => SourceError::Io(err),
    }
}

impl<'a> Source<'a> {
    /// Takes up to `size` bytes, returning them with the offset they were read from.
    pub fn fetch(self, size: usize) -> Result<(Cow<'a, [u8]>, Option<u64>), SourceError> {
        match self {
            Source::Buffer(data) => Ok((Cow::Borrowed(data), None)),
            Source::Stream(stream) => {
                let offset = match stream.position() {
                    Ok(pos) => Some(pos),
                    Err(err) if err.kind() == io::ErrorKind::Unsupported => None,
                    Err(err) => return Err(SourceError::Io(err)),
                };

                let mut buf = Vec::with_capacity(size);
                stream
                    .take(size as u64)
                    .read_to_end(&mut buf)
                    .map_err(map_io)?;

                Ok((Cow::Owned(buf), offset))
            }
        }
    }
}
