//! ACAD_PROXY_OBJECT records
//!
//! The binary payload is kept opaque; only its size and the leading
//! little-endian header words are summarised.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

/// Summary of a proxy's binary payload (concatenated 310 chunks)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProxyPayload {
    /// Decoded bytes
    pub data: Vec<u8>,
    /// Size in bits declared by code 93
    pub declared_bits: Option<i32>,
    /// First little-endian u32 of the payload
    pub header_size: Option<u32>,
    /// Second little-endian u32 of the payload
    pub header_class_id: Option<u32>,
    /// Chunks that were not valid hex
    pub malformed_chunks: usize,
}

impl ProxyPayload {
    fn from_chunks<'a>(chunks: impl Iterator<Item = &'a str>, declared_bits: Option<i32>) -> Self {
        let mut data = Vec::new();
        let mut malformed_chunks = 0;
        for chunk in chunks {
            match decode_hex(chunk.trim()) {
                Some(bytes) => data.extend(bytes),
                None => malformed_chunks += 1,
            }
        }

        let mut cursor = Cursor::new(data.as_slice());
        let header_size = cursor.read_u32::<LittleEndian>().ok();
        let header_class_id = cursor.read_u32::<LittleEndian>().ok();

        ProxyPayload {
            data,
            declared_bits,
            header_size,
            header_class_id,
            malformed_chunks,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the declared bit size fits the received bytes
    pub fn is_consistent(&self) -> bool {
        match self.declared_bits {
            Some(bits) if bits >= 0 => (bits as usize).div_ceil(8) <= self.data.len(),
            _ => true,
        }
    }
}

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| text.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
        .collect()
}

/// An object written by an application that is not loaded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProxyObject {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Proxy class id (90), always 499
    pub proxy_class_id: i32,
    /// Application class id (91)
    pub application_class_id: i32,
    /// Original DXF format flag (95)
    pub original_format: Option<i32>,
    pub payload: ProxyPayload,
    /// Object references (330, 340, 350, 360)
    pub references: Vec<Handle>,
}

impl ProxyObject {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let owner = owner_handle(lookup.tags());
        let chunks = lookup.all(310).filter_map(|t| t.as_str());
        let payload = ProxyPayload::from_chunks(chunks, lookup.i32(93));
        let references = lookup
            .handles(&[330, 340, 350, 360])
            .into_iter()
            .filter(|h| Some(*h) != owner)
            .collect();
        ProxyObject {
            handle: lookup.handle(5),
            owner,
            line,
            proxy_class_id: lookup.i32(90).unwrap_or(499),
            application_class_id: lookup.i32(91).unwrap_or(0),
            original_format: lookup.i32(95),
            payload,
            references,
        }
    }
}
