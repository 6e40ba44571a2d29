//! Shared test utilities for dxf-document integration tests.
//!
//! Streams are written as `(code, text)` pairs and turned into tags with
//! line numbers the way a tokenizer would report them (two lines per tag).

#![allow(dead_code)]

use dxf_document::{DocumentBuilder, RenderingDocument, Tag};

/// Turn `(code, text)` pairs into tags
pub fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (code, value))| Tag::from_raw(*code, value, i as u32 * 2 + 1))
        .collect()
}

/// Assembles a stream section by section
#[derive(Debug, Clone, Default)]
pub struct StreamBuilder {
    pairs: Vec<(i32, String)>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, pairs: &[(i32, &str)]) {
        self.pairs
            .extend(pairs.iter().map(|(c, v)| (*c, v.to_string())));
    }

    /// HEADER section from `(variable, code, value)` triples
    pub fn header(mut self, variables: &[(&str, i32, &str)]) -> Self {
        self.push(&[(0, "SECTION"), (2, "HEADER")]);
        for (name, code, value) in variables {
            self.push(&[(9, *name), (*code, *value)]);
        }
        self.push(&[(0, "ENDSEC")]);
        self
    }

    /// TABLES section; each table is wrapped in TABLE/ENDTAB
    pub fn tables(mut self, tables: &[(&str, &[(i32, &str)])]) -> Self {
        self.push(&[(0, "SECTION"), (2, "TABLES")]);
        for (name, records) in tables {
            self.push(&[(0, "TABLE"), (2, *name)]);
            self.push(records);
            self.push(&[(0, "ENDTAB")]);
        }
        self.push(&[(0, "ENDSEC")]);
        self
    }

    /// Any other section with a raw body
    pub fn section(mut self, name: &str, body: &[(i32, &str)]) -> Self {
        self.push(&[(0, "SECTION"), (2, name)]);
        self.push(body);
        self.push(&[(0, "ENDSEC")]);
        self
    }

    /// Close the stream with EOF and convert to tags
    pub fn finish(mut self) -> Vec<Tag> {
        self.push(&[(0, "EOF")]);
        self.pairs
            .iter()
            .enumerate()
            .map(|(i, (code, value))| Tag::from_raw(*code, value, i as u32 * 2 + 1))
            .collect()
    }

    pub fn build(self) -> RenderingDocument {
        DocumentBuilder::new(self.finish()).build()
    }
}
