//! # dxf-document
//!
//! Resolves a tokenized DXF tag stream into a strongly-typed, cross-referenced
//! document model.
//!
//! The input is the flat `(group code, value, line)` sequence a DXF tokenizer
//! produces. The output is a [`RenderingDocument`]: symbol tables, drawing
//! properties from the HEADER, catalogs of OBJECTS-section records, decoded
//! entities with resolved references, block definitions and per-block usage
//! metadata.
//!
//! ## Features
//!
//! - 15 symbol tables with name and handle lookup
//! - 40+ entity kinds, unknown kinds kept as raw tags
//! - POLYLINE/VERTEX/SEQEND, INSERT/ATTRIB/SEQEND and BLOCK/ENDBLK assembly
//! - Dimension style cascade with `DSTYLE` xdata overrides
//! - Cycle-safe dictionary walks for INSERT clip filters
//! - Block unit conversion and instance diagnostics
//!
//! ## Quick Start
//!
//! ```rust
//! use dxf_document::{DocumentBuilder, Tag};
//!
//! let tags: Vec<Tag> = [
//!     (0, "SECTION"),
//!     (2, "ENTITIES"),
//!     (0, "LINE"),
//!     (8, "0"),
//!     (10, "0"),
//!     (20, "0"),
//!     (11, "3"),
//!     (21, "4"),
//!     (0, "ENDSEC"),
//!     (0, "EOF"),
//! ]
//! .iter()
//! .enumerate()
//! .map(|(i, (code, value))| Tag::from_raw(*code, value, i as u32 * 2 + 1))
//! .collect();
//!
//! let document = DocumentBuilder::new(tags).build();
//! assert_eq!(document.entities().len(), 1);
//! ```
//!
//! ## Architecture
//!
//! - [`io`] - tags, group-code value types and section/record splitting
//! - [`tables`] - symbol table records
//! - [`objects`] - OBJECTS-section records and handle-indexed catalogs
//! - [`entities`] - entity geometry and common metadata
//! - [`builder`] - the passes that turn a stream into a document
//! - [`document`] - the resolved document and derived metadata

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod builder;
pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod objects;
pub mod tables;
pub mod types;
pub mod xdata;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{Color, DxfVersion, Handle, LineWeight, Transparency, Vector2, Vector3};

// Re-export the builder
pub use builder::{build_all, BuilderConfiguration, DocumentBuilder};

// Re-export document types
pub use document::{BlockMetadata, DrawingProperties, RenderingDocument, ResolvedRef};

// Re-export entity types
pub use entities::{BlockDefinition, Entity, EntityCommon, Geometry, Space};

// Re-export table types
pub use tables::{SymbolTables, Table, TableEntry};

// Re-export I/O types
pub use io::{Tag, TagValue};

pub use notification::{Notification, NotificationCollection, NotificationType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
