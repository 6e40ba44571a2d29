//! DBCOLOR objects grouped into color books

use crate::io::{owner_handle, CodeLookup};
use crate::types::{Color, Handle};

/// One named color from a color book
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookColor {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Book part of `BOOK$COLOR` (430)
    pub book: String,
    /// Color part of `BOOK$COLOR`
    pub name: String,
    /// Resolved color (62 / 420)
    pub color: Color,
}

impl BookColor {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let full = lookup.string(430).unwrap_or_default();
        let (book, name) = split_book_name(&full);
        BookColor {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            book: book.to_string(),
            name: name.to_string(),
            color: Color::resolve(lookup.i16(62), lookup.i64(420)),
        }
    }

    /// `BOOK$COLOR` form used by entity code 430
    pub fn full_name(&self) -> String {
        if self.book.is_empty() {
            self.name.clone()
        } else {
            format!("{}${}", self.book, self.name)
        }
    }
}

/// Split `BOOK$COLOR` at the first `$`; a name without one has no book
pub(crate) fn split_book_name(full: &str) -> (&str, &str) {
    match full.split_once('$') {
        Some((book, name)) => (book.trim(), name.trim()),
        None => ("", full.trim()),
    }
}

/// All colors of one book, in stream order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorBook {
    pub name: String,
    pub colors: Vec<BookColor>,
}

impl ColorBook {
    pub fn new(name: impl Into<String>) -> Self {
        ColorBook {
            name: name.into(),
            colors: Vec::new(),
        }
    }

    /// Color with the given name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&BookColor> {
        self.colors.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_book_color() {
        let t: Vec<Tag> = [
            (5, "50"),
            (100, "AcDbColor"),
            (62, "3"),
            (420, "65280"),
            (430, "PANTONE$PANTONE 354 C"),
        ]
        .iter()
        .map(|(c, v)| Tag::from_raw(*c, v, 0))
        .collect();
        let c = BookColor::decode(&CodeLookup::new(&t), 1);
        assert_eq!(c.book, "PANTONE");
        assert_eq!(c.name, "PANTONE 354 C");
        assert_eq!(c.color, Color::from_rgb(0, 255, 0));
        assert_eq!(c.full_name(), "PANTONE$PANTONE 354 C");
    }

    #[test]
    fn test_split_without_book() {
        assert_eq!(split_book_name("Plain"), ("", "Plain"));
    }
}
