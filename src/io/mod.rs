//! Tag-level plumbing shared by every extractor
//!
//! The tokenizer that turns bytes into tags lives outside this crate; this
//! module starts from an ordered `Vec<Tag>` and provides the typed value
//! model, per-record code lookup and the section/record scanner.

mod code_lookup;
mod code_page;
mod group_code;
mod section;
mod tag;

pub use code_lookup::{collect_points, group_handles, owner_handle, CodeLookup};
pub use code_page::encoding_for_code_page;
pub use group_code::GroupCodeValueType;
pub use section::{
    split_records, split_subclasses, subclass, Record, Section, SectionState, TagStream,
};
pub use tag::{Tag, TagValue};
