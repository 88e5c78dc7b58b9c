//! Helper macros and small text utilities shared by the tokenizer, the
//! attribute parser and the feature printers.

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}
pub use with_field_fn;

/// Finds `key` inside a column-9 attribute string and returns the byte offset
/// right after the key.
///
/// The key only matches at the start of the string or right after a `;` or
/// whitespace, so `ID=` is not found inside `geneID=`.
pub fn find_key(
    info: &str,
    key: &str,
    ignore_case: bool,
) -> Option<usize> {
    let hay = info.as_bytes();
    let needle = key.as_bytes();
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    (0..=hay.len() - needle.len())
        .filter(|&i| i == 0 || hay[i - 1] == b';' || hay[i - 1].is_ascii_whitespace())
        .find(|&i| {
            let window = &hay[i..i + needle.len()];
            if ignore_case {
                window.eq_ignore_ascii_case(needle)
            }
            else {
                window == needle
            }
        })
        .map(|i| i + needle.len())
}

/// Value of a `key=value` pair starting at `from`, terminated by `;` or the
/// end of the string.
pub fn value_until_semicolon(
    info: &str,
    from: usize,
) -> &str {
    let rest = &info[from..];
    match rest.find(';') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Parses the leading decimal digits of `s` (after optional spaces) and
/// returns the number and the unparsed remainder.
pub fn parse_uint_prefix(s: &str) -> Option<(u32, &str)> {
    let s = s.trim_start_matches(' ');
    let digits = s
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let value = s[..digits].parse::<u32>().ok()?;
    Some((value, &s[digits..]))
}

/// Formats a score the way annotation records print it: two decimals when
/// set, `.` otherwise.
pub fn format_score(score: f64) -> String {
    if score != 0.0 {
        format!("{:.2}", score)
    }
    else {
        ".".to_string()
    }
}
