//! Culture-invariant text forms for primitive values.

use crate::inspect::{Flags, Primitive};

#[inline]
pub(crate) fn write_primitive(output: &mut String, primitive: &Primitive<'_>) {
    match primitive {
        Primitive::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Primitive::Int(i) => output.push_str(&i.to_string()),
        Primitive::UInt(u) => output.push_str(&u.to_string()),
        Primitive::F32(f) => write_float(output, *f as f64, f.to_string()),
        Primitive::F64(f) => write_float(output, *f, f.to_string()),
        Primitive::Char(c) => write_char(output, *c),
        Primitive::Str(s) => write_quoted(output, s),
        Primitive::Variant(name) => output.push_str(name),
        Primitive::Guid(guid) => output.push_str(&guid.hyphenated().to_string()),
        Primitive::Text(text) => output.push_str(text),
    }
}

// `digits` is the shortest round-trip form at the source width.
fn write_float(output: &mut String, value: f64, digits: String) {
    if value.is_nan() {
        output.push_str("NaN");
    } else if value == f64::INFINITY {
        output.push_str("Infinity");
    } else if value == f64::NEG_INFINITY {
        output.push_str("-Infinity");
    } else {
        output.push_str(&digits);
    }
}

/// Writes `s` in double quotes, doubling embedded quotes.
pub(crate) fn write_quoted(output: &mut String, s: &str) {
    output.reserve(s.len() + 2);
    output.push('"');
    for ch in s.chars() {
        if ch == '"' {
            output.push_str("\"\"");
        } else {
            output.push(ch);
        }
    }
    output.push('"');
}

fn write_char(output: &mut String, c: char) {
    output.push('\'');
    if c == '\'' {
        output.push_str("''");
    } else {
        output.push(c);
    }
    output.push('\'');
}

pub(crate) fn pointer(address: usize) -> String {
    format!("0x{:016X}", address)
}

pub(crate) fn write_flags(output: &mut String, flags: &Flags) {
    match flags.names() {
        Some(names) if names.is_empty() => output.push('0'),
        Some(names) => output.push_str(&names.join(", ")),
        None => output.push_str(&flags.bits().to_string()),
    }
}

/// Strips module paths from a type name produced by [`std::any::type_name`].
///
/// # Examples
///
/// ```rust
/// use propstring::short_type_name;
///
/// assert_eq!(short_type_name("alloc::vec::Vec<my_app::model::Node>"), "Vec<Node>");
/// assert_eq!(short_type_name("i32"), "i32");
/// assert_eq!(short_type_name("&dyn core::fmt::Debug"), "&dyn Debug");
/// ```
#[must_use]
pub fn short_type_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut segment_start = 0;
    for (index, ch) in full.char_indices() {
        if !(ch.is_alphanumeric() || ch == '_' || ch == ':') {
            push_last_segment(&mut short, &full[segment_start..index]);
            short.push(ch);
            segment_start = index + ch.len_utf8();
        }
    }
    push_last_segment(&mut short, &full[segment_start..]);
    short
}

fn push_last_segment(output: &mut String, path: &str) {
    match path.rfind("::") {
        Some(index) => output.push_str(&path[index + 2..]),
        None => output.push_str(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use uuid::Uuid;

    fn render(primitive: Primitive<'_>) -> String {
        let mut output = String::new();
        write_primitive(&mut output, &primitive);
        output
    }

    #[test]
    fn test_numbers_are_invariant() {
        assert_eq!(render(Primitive::Int(-15789632)), "-15789632");
        assert_eq!(render(Primitive::UInt(u128::MAX)), u128::MAX.to_string());
        assert_eq!(render(Primitive::F64(3.5)), "3.5");
        assert_eq!(render(Primitive::F64(1.0)), "1");
        assert_eq!(render(Primitive::F32(0.1)), "0.1");
    }

    #[test]
    fn test_special_floats() {
        assert_eq!(render(Primitive::F64(f64::NAN)), "NaN");
        assert_eq!(render(Primitive::F64(f64::INFINITY)), "Infinity");
        assert_eq!(render(Primitive::F32(f32::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn test_strings_double_quotes() {
        assert_eq!(render(Primitive::Str(Cow::Borrowed("plain"))), "\"plain\"");
        assert_eq!(
            render(Primitive::Str(Cow::Borrowed("say \"hi\""))),
            "\"say \"\"hi\"\"\""
        );
        assert_eq!(render(Primitive::Str(Cow::Borrowed(""))), "\"\"");
    }

    #[test]
    fn test_chars_double_single_quotes() {
        assert_eq!(render(Primitive::Char('x')), "'x'");
        assert_eq!(render(Primitive::Char('\'')), "''''");
        assert_eq!(render(Primitive::Char('"')), "'\"'");
    }

    #[test]
    fn test_unquoted_forms() {
        assert_eq!(render(Primitive::Variant(Cow::Borrowed("Red"))), "Red");
        assert_eq!(render(Primitive::Text(Cow::Borrowed("12n"))), "12n");
        assert_eq!(render(Primitive::Bool(false)), "false");
        assert_eq!(
            render(Primitive::Guid(Uuid::nil())),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_pointer_is_fixed_width() {
        assert_eq!(pointer(0), "0x0000000000000000");
        assert_eq!(pointer(0xDEAD_BEEF), "0x00000000DEADBEEF");
    }

    #[test]
    fn test_flags_fallbacks() {
        const NAMES: &[(&str, u64)] = &[("A", 1), ("B", 2)];
        let mut output = String::new();
        write_flags(&mut output, &Flags::new(0, NAMES));
        assert_eq!(output, "0");

        output.clear();
        write_flags(&mut output, &Flags::new(3, NAMES));
        assert_eq!(output, "A, B");

        output.clear();
        write_flags(&mut output, &Flags::new(6, NAMES));
        assert_eq!(output, "6");
    }

    #[test]
    fn test_short_type_names() {
        assert_eq!(
            short_type_name("core::option::Option<alloc::rc::Rc<core::cell::RefCell<app::Node>>>"),
            "Option<Rc<RefCell<Node>>>"
        );
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<alloc::string::String, i32>"),
            "HashMap<String, i32>"
        );
        assert_eq!(short_type_name("fn(i32) -> i32"), "fn(i32) -> i32");
        assert_eq!(short_type_name("[u8; 4]"), "[u8; 4]");
        assert_eq!(short_type_name("(i32, &str)"), "(i32, &str)");
    }
}
