//! Registry of primitive wire types.
//!
//! Every primitive is named by a single pack letter (`C`, `s`, `N`, `A`, ...), optionally
//! followed by an endian modifier (`<` little, `>` big) on the integer letters that allow it.
//! C-style aliases such as `uint32_t` or `unsigned long long` resolve onto the same letters.

use std::fmt;

use crate::errors::SchemaError;

/// Byte order of a numeric primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Byte order of the host.
    #[default]
    Native,
    Little,
    Big,
}

/// Order of the two hex digits rendered for each byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NibbleOrder {
    HighFirst,
    LowFirst,
}

/// What a primitive decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Unsigned,
    Signed,
    Float,
    /// Bytes kept verbatim.
    Raw,
    /// Trailing NULs and then trailing spaces are stripped; encoded space padded.
    Padded,
    /// Trailing NULs are stripped; encoded NUL padded.
    NulTerminated,
    /// Bytes rendered as hex digits.
    Hex(NibbleOrder),
    /// Bytes consumed but never materialized.
    Skip,
}

impl Kind {
    /// True for integer and float kinds.
    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Unsigned | Kind::Signed | Kind::Float)
    }
}

/// A resolved primitive: pack letter, width in bytes, value kind and byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    pub token: char,
    pub width: usize,
    pub kind: Kind,
    pub endian: Endian,
}

impl TypeSpec {
    const fn new(token: char, width: usize, kind: Kind, endian: Endian) -> Self {
        TypeSpec {
            token,
            width,
            kind,
            endian,
        }
    }

    /// Looks up a bare pack letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        use Endian::*;
        use Kind::*;

        let spec = match letter {
            'C' => Self::new(letter, 1, Unsigned, Native),
            'S' => Self::new(letter, 2, Unsigned, Native),
            'I' | 'L' => Self::new(letter, 4, Unsigned, Native),
            'Q' => Self::new(letter, 8, Unsigned, Native),

            'c' => Self::new(letter, 1, Signed, Native),
            's' => Self::new(letter, 2, Signed, Native),
            'i' | 'l' => Self::new(letter, 4, Signed, Native),
            'q' => Self::new(letter, 8, Signed, Native),

            'n' => Self::new(letter, 2, Unsigned, Big),
            'N' => Self::new(letter, 4, Unsigned, Big),
            'v' => Self::new(letter, 2, Unsigned, Little),
            'V' => Self::new(letter, 4, Unsigned, Little),

            'A' => Self::new(letter, 1, Padded, Native),
            'a' => Self::new(letter, 1, Raw, Native),
            'Z' => Self::new(letter, 1, NulTerminated, Native),
            'H' => Self::new(letter, 1, Hex(NibbleOrder::HighFirst), Native),
            'h' => Self::new(letter, 1, Hex(NibbleOrder::LowFirst), Native),

            'D' | 'd' => Self::new(letter, 8, Float, Native),
            'F' | 'f' => Self::new(letter, 4, Float, Native),
            'E' => Self::new(letter, 8, Float, Little),
            'e' => Self::new(letter, 4, Float, Little),
            'G' => Self::new(letter, 8, Float, Big),
            'g' => Self::new(letter, 4, Float, Big),

            'x' => Self::new(letter, 1, Skip, Native),
            _ => return None,
        };

        Some(spec)
    }

    /// Applies an endian modifier (`<` or `>`). Only native-order integer letters accept one.
    pub fn with_modifier(self, modifier: char) -> Option<Self> {
        if !matches!(self.token, 'S' | 's' | 'I' | 'i' | 'L' | 'l' | 'Q' | 'q') {
            return None;
        }

        let endian = match modifier {
            '<' => Endian::Little,
            '>' => Endian::Big,
            _ => return None,
        };

        Some(TypeSpec { endian, ..self })
    }

    /// Pack token text for this primitive, including an endian modifier when one was applied.
    pub fn token_str(&self) -> String {
        let modified = matches!(self.token, 'S' | 's' | 'I' | 'i' | 'L' | 'l' | 'Q' | 'q');
        match (modified, self.endian) {
            (true, Endian::Little) => format!("{}<", self.token),
            (true, Endian::Big) => format!("{}>", self.token),
            _ => self.token.to_string(),
        }
    }

    /// Byte extent of a single string, hex or skip field whose token carries `count`.
    ///
    /// Hex counts are in digits, two per byte, so odd counts are rejected.
    pub fn extent(&self, count: usize) -> Result<usize, SchemaError> {
        match self.kind {
            Kind::Hex(_) if count % 2 != 0 => Err(SchemaError::OddHexCount {
                token: self.token,
                count,
            }),
            Kind::Hex(_) => Ok(count / 2),
            _ => count
                .checked_mul(self.width)
                .ok_or_else(|| SchemaError::LayoutTooLarge(self.token_str())),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token_str())
    }
}

const ALIASES: &[(char, &[&str])] = &[
    ('C', &["uint8_t", "unsigned char", "_BYTE"]),
    ('S', &["uint16_t", "unsigned short"]),
    ('I', &["uint32_t", "unsigned", "unsigned int"]),
    ('L', &["unsigned long"]),
    ('Q', &["uint64_t", "unsigned long long"]),
    ('c', &["int8_t", "char", "signed char"]),
    ('s', &["int16_t", "short", "signed short"]),
    ('i', &["int32_t", "int", "signed", "signed int"]),
    ('l', &["long", "signed long"]),
    ('q', &["int64_t", "long long", "signed long long"]),
    ('n', &["uint16_be", "uint16_t_be", "be16"]),
    ('N', &["uint32_be", "uint32_t_be", "be32"]),
    ('v', &["uint16_le", "uint16_t_le", "le16"]),
    ('V', &["uint32_le", "uint32_t_le", "le32"]),
    ('d', &["double"]),
    ('f', &["float"]),
    ('E', &["double_le"]),
    ('e', &["float_le"]),
    ('G', &["double_be"]),
    ('g', &["float_be"]),
];

fn alias_letter(alias: &str) -> Option<char> {
    ALIASES
        .iter()
        .find(|(_, names)| names.contains(&alias))
        .map(|(letter, _)| *letter)
}

/// Resolves a C-style alias or a pack token (letter plus optional `<`/`>`).
pub fn resolve(name: &str) -> Result<TypeSpec, SchemaError> {
    if let Some(letter) = alias_letter(name) {
        if let Some(spec) = TypeSpec::from_letter(letter) {
            return Ok(spec);
        }
    }

    let mut chars = name.chars();
    let spec = match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), None, None) => TypeSpec::from_letter(letter),
        (Some(letter), Some(modifier), None) => {
            TypeSpec::from_letter(letter).and_then(|spec| spec.with_modifier(modifier))
        }
        _ => None,
    };

    spec.ok_or_else(|| SchemaError::UnknownFieldType(name.to_string()))
}

/// Width in bytes of a C-style alias, or `None` if the alias is not registered.
pub fn width_of(alias: &str) -> Option<usize> {
    alias_letter(alias)
        .and_then(TypeSpec::from_letter)
        .map(|spec| spec.width)
}
