//! Short type names for logs and error messages
//!
//! `std::any::type_name` returns full paths. Every path segment is cut to
//! its last component, generic arguments included:
//! `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.

use std::borrow::Cow;

/// Short name of `T`
///
/// ```rust
/// use kernel::type_name::short_type_name;
///
/// assert_eq!(short_type_name::<String>(), "String");
/// assert_eq!(short_type_name::<Vec<Option<String>>>(), "Vec<Option<String>>");
/// assert_eq!(short_type_name::<(u8, std::sync::Arc<str>)>(), "(u8, Arc<str>)");
/// ```
pub fn short_type_name<T: ?Sized>() -> Cow<'static, str> {
    shorten(std::any::type_name::<T>())
}

fn shorten(full: &'static str) -> Cow<'static, str> {
    if !full.contains(is_separator) {
        return Cow::Borrowed(last_segment(full));
    }

    let mut short = String::with_capacity(full.len());
    let mut rest = full;
    while let Some(at) = rest.find(is_separator) {
        let (path, tail) = rest.split_at(at);
        let separator_len = tail.chars().next().map_or(1, char::len_utf8);
        let (separator, tail) = tail.split_at(separator_len);
        short.push_str(last_segment(path));
        short.push_str(separator);
        rest = tail;
    }
    short.push_str(last_segment(rest));
    Cow::Owned(short)
}

fn is_separator(c: char) -> bool {
    matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' | '*')
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod billing {
        pub struct Invoice<T>(pub T);
        pub struct Draft;
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(short_type_name::<i32>(), "i32");
        assert_eq!(short_type_name::<billing::Draft>(), "Draft");
        assert!(matches!(short_type_name::<billing::Draft>(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_generic_arguments_are_shortened() {
        assert_eq!(short_type_name::<Vec<String>>(), "Vec<String>");
        assert_eq!(
            short_type_name::<billing::Invoice<billing::Draft>>(),
            "Invoice<Draft>"
        );
        assert_eq!(
            short_type_name::<Result<Option<u8>, billing::Invoice<String>>>(),
            "Result<Option<u8>, Invoice<String>>"
        );
    }

    #[test]
    fn test_references_slices_and_tuples() {
        assert_eq!(short_type_name::<&'static str>(), "&str");
        assert_eq!(short_type_name::<[billing::Draft]>(), "[Draft]");
        assert_eq!(short_type_name::<(String, Option<u8>)>(), "(String, Option<u8>)");
    }
}
