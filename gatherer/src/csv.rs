//! Pure row/array formatting helpers.
//!
//! The default column separator is `;` rather than `,` because commas collide
//! with decimal and vector text representations in exported values. Downstream
//! tooling parses these files, so the output format here is load-bearing.

use std::fmt;

/// Default column separator for exported rows and headers.
pub const DEFAULT_SEPARATOR: char = ';';

/// Separator used inside bracketed array values embedded in a single column.
pub const ARRAY_SEPARATOR: char = ',';

/// Joins `values` into one delimited row.
///
/// With `filter_empty`, entries whose string form is empty are omitted
/// entirely (not replaced with an empty column). That changes the column
/// count, so callers must apply the same filtering to header generation.
pub fn join_as_csv<I, S>(values: I, separator: char, filter_empty: bool) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row = String::new();
    let mut first = true;
    for value in values {
        let value = value.as_ref();
        if filter_empty && value.is_empty() {
            continue;
        }
        if !first {
            row.push(separator);
        }
        row.push_str(value);
        first = false;
    }
    row
}

/// Formats a fixed-size value array as `[v1,v2,...]` for embedding a
/// multi-value field inside a single CSV column.
pub fn array_to_string<T: fmt::Display>(values: &[T], separator: char) -> String {
    let mut out = String::from("[");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(&value.to_string());
    }
    out.push(']');
    out
}

/// Produces `n` empty columns, i.e. `n - 1` bare separators. Used to pad rows
/// to the declared header width on partial failures.
pub fn empty_columns(n: usize, separator: char) -> String {
    if n <= 1 {
        return String::new();
    }
    std::iter::repeat(separator).take(n - 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_empty_input_is_empty() {
        let none: [&str; 0] = [];
        assert_eq!(join_as_csv(none, DEFAULT_SEPARATOR, true), "");
        let none: [&str; 0] = [];
        assert_eq!(join_as_csv(none, DEFAULT_SEPARATOR, false), "");
    }

    #[test]
    fn join_filters_empty_entries_when_asked() {
        assert_eq!(join_as_csv(["a", "", "b"], ';', true), "a;b");
        assert_eq!(join_as_csv(["a", "", "b"], ';', false), "a;;b");
        assert_eq!(join_as_csv(["", "", ""], ';', true), "");
    }

    #[test]
    fn join_respects_custom_separator() {
        assert_eq!(join_as_csv(["1", "2", "3"], ',', false), "1,2,3");
    }

    #[test]
    fn array_to_string_brackets_values() {
        assert_eq!(array_to_string(&[1.0f32, 2.0, 3.0], ','), "[1,2,3]");
        assert_eq!(array_to_string::<f32>(&[], ','), "[]");
    }

    #[test]
    fn empty_columns_yields_bare_separators() {
        assert_eq!(empty_columns(0, ';'), "");
        assert_eq!(empty_columns(1, ';'), "");
        assert_eq!(empty_columns(3, ';'), ";;");
    }
}
