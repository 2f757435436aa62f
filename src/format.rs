//! Pack-style format strings such as `"L S C"` or `"A8 i3 x4 q"`.
//!
//! Each token is a letter from the catalog, an optional `<`/`>` endian modifier and an optional
//! decimal count. Whitespace between tokens is ignored.

use std::{iter::Peekable, str::Chars};

use crate::{
    catalog::{Kind, TypeSpec},
    errors::SchemaError,
    field::FieldType,
    layout::{Layout, LayoutBuilder},
};

/// Splits a format string into `(primitive, count)` pairs. A missing count is 1.
pub fn tokenize(fmt: &str) -> Result<Vec<(TypeSpec, usize)>, SchemaError> {
    let mut tokens = Vec::new();
    let mut chars = fmt.chars().peekable();

    while let Some(letter) = chars.next() {
        if letter.is_whitespace() {
            continue;
        }

        let mut spec = TypeSpec::from_letter(letter)
            .ok_or_else(|| SchemaError::UnknownFieldType(letter.to_string()))?;

        if let Some(&modifier) = chars.peek() {
            if modifier == '<' || modifier == '>' {
                chars.next();
                spec = spec
                    .with_modifier(modifier)
                    .ok_or_else(|| SchemaError::UnknownFieldType(format!("{letter}{modifier}")))?;
            }
        }

        let count = read_count(&mut chars)
            .map_err(|digits| SchemaError::UnknownFieldType(format!("{letter}{digits}")))?;
        tokens.push((spec, count.unwrap_or(1)));
    }

    Ok(tokens)
}

fn read_count(chars: &mut Peekable<Chars<'_>>) -> Result<Option<usize>, String> {
    let mut digits = String::new();
    while let Some(&d) = chars.peek() {
        if !d.is_ascii_digit() {
            break;
        }
        digits.push(d);
        chars.next();
    }

    if digits.is_empty() {
        return Ok(None);
    }

    digits.parse().map(Some).map_err(|_| digits)
}

fn auto_name(offset: usize) -> String {
    format!("f{:x}", offset)
}

/// Lays out a format string.
///
/// Without names every scalar gets its own field named after its hex offset (`f0`, `f3`, ...),
/// so `"L2"` becomes two fields. Each supplied name instead claims a whole token, so `"L2"`
/// with one name becomes a single two-element field. Once the names run out the remaining
/// tokens fall back to offset names. `rename` is applied last.
pub fn parse_format(
    fmt: &str,
    names: &[String],
    rename: &[(String, String)],
    forced_size: Option<usize>,
) -> Result<Layout, SchemaError> {
    let mut builder = LayoutBuilder::new();
    let mut names_iter = names.iter();

    for (spec, count) in tokenize(fmt)? {
        match spec.kind {
            Kind::Skip => builder.skip(spec.extent(count)?)?,
            kind if kind.is_numeric() => {
                if let Some(name) = names_iter.next() {
                    let size = spec
                        .width
                        .checked_mul(count)
                        .ok_or_else(|| SchemaError::LayoutTooLarge(name.clone()))?;
                    builder.push(name.clone(), FieldType::Primitive(spec), count, size)?;
                } else {
                    for _ in 0..count {
                        let name = auto_name(builder.cursor());
                        builder.push(name, FieldType::Primitive(spec), 1, spec.width)?;
                    }
                }
            }
            _ => {
                let size = spec.extent(count)?;
                let name = names_iter
                    .next()
                    .cloned()
                    .unwrap_or_else(|| auto_name(builder.cursor()));
                builder.push(name, FieldType::Primitive(spec), 1, size)?;
            }
        }
    }

    let unused = names_iter.len();
    if unused > 0 {
        return Err(SchemaError::TooManyNames {
            expected: names.len() - unused,
            given: names.len(),
        });
    }

    for (from, to) in rename {
        builder.rename(from, to)?;
    }

    let mut layout = builder.finish(forced_size)?;
    layout.format = fmt.trim().to_string();
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(layout: &Layout) -> Vec<&str> {
        layout.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("A8 i3 x4 q").unwrap();
        let summary: Vec<(char, usize)> = tokens.iter().map(|(s, c)| (s.token, *c)).collect();
        assert_eq!(summary, vec![('A', 8), ('i', 3), ('x', 4), ('q', 1)]);
    }

    #[test]
    fn test_tokenize_modifiers() {
        let tokens = tokenize("S>L<q").unwrap();
        assert_eq!(tokens[0].0.token_str(), "S>");
        assert_eq!(tokens[1].0.token_str(), "L<");
        assert_eq!(tokens[2].0.token_str(), "q");
    }

    #[test]
    fn test_unknown_letter() {
        assert_eq!(
            tokenize("K").unwrap_err(),
            SchemaError::UnknownFieldType("K".to_string())
        );
        assert_eq!(
            tokenize("n>").unwrap_err(),
            SchemaError::UnknownFieldType("n>".to_string())
        );
    }

    #[test]
    fn test_auto_names_use_hex_offsets() {
        let layout = parse_format("C S L", &[], &[], None).unwrap();
        assert_eq!(names(&layout), vec!["f0", "f1", "f3"]);
        assert_eq!(layout.size, 7);
    }

    #[test]
    fn test_auto_names_expand_repeats() {
        let layout = parse_format("L3 x4 A16 C", &[], &[], None).unwrap();
        assert_eq!(names(&layout), vec!["f0", "f4", "f8", "f10", "f20"]);
        assert_eq!(layout.fields[3].size, 16);
        assert_eq!(layout.padding, vec![12..16]);
    }

    #[test]
    fn test_named_repeat_is_one_sequence_field() {
        let layout = parse_format("L2 C", &owned(&["pair", "tail"]), &[], None).unwrap();
        assert_eq!(names(&layout), vec!["pair", "tail"]);
        assert_eq!(layout.fields[0].count, 2);
        assert_eq!(layout.fields[0].size, 8);
        assert!(layout.fields[0].is_array());
        assert_eq!(layout.fields[1].offset, 8);
    }

    #[test]
    fn test_names_run_out() {
        let layout = parse_format("C S L", &owned(&["a"]), &[], None).unwrap();
        assert_eq!(names(&layout), vec!["a", "f1", "f3"]);
    }

    #[test]
    fn test_too_many_names() {
        assert_eq!(
            parse_format("C", &owned(&["a", "b"]), &[], None).unwrap_err(),
            SchemaError::TooManyNames {
                expected: 1,
                given: 2
            }
        );
    }

    #[test]
    fn test_rename_auto_names() {
        let rename = vec![
            ("f0".to_string(), "byte_field".to_string()),
            ("f3".to_string(), "long_field".to_string()),
        ];
        let layout = parse_format("C S L", &[], &rename, None).unwrap();
        assert_eq!(names(&layout), vec!["byte_field", "f1", "long_field"]);
    }

    #[test]
    fn test_rename_unknown() {
        let rename = vec![("nope".to_string(), "x".to_string())];
        assert_eq!(
            parse_format("C", &[], &rename, None).unwrap_err(),
            SchemaError::UnknownRename("nope".to_string())
        );
    }

    #[test]
    fn test_zero_length_string() {
        let layout = parse_format("C a0 C", &owned(&["a", "b", "c"]), &[], None).unwrap();
        assert_eq!(layout.size, 2);
        assert_eq!(layout.fields[1].size, 0);
        assert_eq!(layout.fields[2].offset, 1);
    }

    #[test]
    fn test_hex_extent_is_half_the_count() {
        let layout = parse_format("H8 h4", &[], &[], None).unwrap();
        assert_eq!(layout.size, 6);
        assert_eq!(names(&layout), vec!["f0", "f4"]);
    }

    #[test]
    fn test_odd_hex_count_rejected() {
        assert_eq!(
            parse_format("H3", &[], &[], None).unwrap_err(),
            SchemaError::OddHexCount {
                token: 'H',
                count: 3
            }
        );
    }

    #[test]
    fn test_zero_count_takes_a_name() {
        let layout = parse_format("L0 C", &owned(&["a", "b"]), &[], None).unwrap();
        assert_eq!(names(&layout), vec!["a", "b"]);
        assert_eq!(layout.fields[0].size, 0);
        assert!(layout.fields[0].is_array());
        assert_eq!(layout.fields[1].offset, 0);
        assert_eq!(layout.size, 1);
    }

    #[test]
    fn test_zero_count_without_names() {
        let layout = parse_format("L0 C", &[], &[], None).unwrap();
        assert_eq!(names(&layout), vec!["f0"]);
    }

    #[test]
    fn test_huge_counts_are_rejected() {
        assert_eq!(
            parse_format("a18446744073709551615 C", &[], &[], None).unwrap_err(),
            SchemaError::LayoutTooLarge("f0".to_string())
        );
        assert_eq!(
            parse_format("L4611686018427387904", &owned(&["big"]), &[], None).unwrap_err(),
            SchemaError::LayoutTooLarge("big".to_string())
        );
        assert_eq!(
            parse_format("C1000000000000", &[], &[], None).unwrap_err(),
            SchemaError::TooManyFields {
                limit: crate::layout::MAX_FIELDS
            }
        );
    }

    #[test]
    fn test_format_is_kept_verbatim() {
        let layout = parse_format(" x4L ", &owned(&["y"]), &[], None).unwrap();
        assert_eq!(layout.format, "x4L");
        assert_eq!(layout.fields[0].offset, 4);
    }
}
