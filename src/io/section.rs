//! Section and record scanning over a flat tag stream
//!
//! `SECTION` / name / ... / `ENDSEC` framing is tracked with an explicit
//! [`SectionState`] machine. Structural mismatches (stray `ENDSEC`, nested
//! `SECTION`, missing name) are absorbed and reported as notifications.

use tracing::trace;

use super::tag::Tag;
use crate::notification::{NotificationCollection, NotificationType};

/// Scanner state while walking section framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionState {
    /// Between sections
    Outside,
    /// Saw `0 SECTION`, waiting for the `2 <name>` tag
    AwaitingName { line: u32 },
    /// Inside a named section whose body starts at `start`
    Inside { name: String, start: usize, line: u32 },
    /// Saw `0 EOF`
    Finished,
}

/// A named section body (framing tags excluded)
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub name: &'a str,
    pub tags: &'a [Tag],
    /// Line of the opening `SECTION` tag
    pub line: u32,
}

impl<'a> Section<'a> {
    /// Split the body into records
    pub fn records(&self) -> Vec<Record<'a>> {
        split_records(self.tags)
    }
}

/// One record: a `0 <kind>` tag and the body tags that follow it
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub kind: &'a str,
    pub tags: &'a [Tag],
    /// Line of the `0 <kind>` tag
    pub line: u32,
}

/// Split a tag run at every code-0 tag.
///
/// Tags before the first code-0 tag belong to no record and are skipped.
pub fn split_records(tags: &[Tag]) -> Vec<Record<'_>> {
    let mut records = Vec::new();
    let mut open: Option<(usize, &Tag)> = None;

    for (i, tag) in tags.iter().enumerate() {
        if tag.code != 0 {
            continue;
        }
        if let Some((start, head)) = open.take() {
            records.push(record(head, &tags[start + 1..i]));
        }
        open = Some((i, tag));
    }
    if let Some((start, head)) = open {
        records.push(record(head, &tags[start + 1..]));
    }
    records
}

fn record<'a>(head: &'a Tag, body: &'a [Tag]) -> Record<'a> {
    Record {
        kind: head.as_str().map(str::trim).unwrap_or(""),
        tags: body,
        line: head.line,
    }
}

/// Split a record body at every subclass marker (code 100).
///
/// The first region holds the tags before any marker and has no name.
pub fn split_subclasses(tags: &[Tag]) -> Vec<(Option<&str>, &[Tag])> {
    let mut regions = Vec::new();
    let mut name: Option<&str> = None;
    let mut start = 0;
    for (i, tag) in tags.iter().enumerate() {
        if tag.code == 100 {
            if i > start || name.is_some() {
                regions.push((name, &tags[start..i]));
            }
            name = tag.as_str().map(str::trim);
            start = i + 1;
        }
    }
    if start < tags.len() || name.is_some() {
        regions.push((name, &tags[start..]));
    }
    regions
}

/// Tags of the first subclass region with the given marker (case-insensitive)
pub fn subclass<'a>(tags: &'a [Tag], marker: &str) -> Option<&'a [Tag]> {
    split_subclasses(tags)
        .into_iter()
        .find(|(name, _)| name.is_some_and(|n| n.eq_ignore_ascii_case(marker)))
        .map(|(_, region)| region)
}

/// Read-only view over the whole tag stream
#[derive(Debug, Clone, Copy)]
pub struct TagStream<'a> {
    tags: &'a [Tag],
}

impl<'a> TagStream<'a> {
    pub fn new(tags: &'a [Tag]) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &'a [Tag] {
        self.tags
    }

    /// Every section in stream order
    pub fn sections(&self) -> Vec<Section<'a>> {
        self.scan(None)
    }

    /// Every section with the given name (case-insensitive), in stream order
    pub fn sections_named(&self, name: &str) -> Vec<Section<'a>> {
        self.sections()
            .into_iter()
            .filter(|s| s.name.eq_ignore_ascii_case(name))
            .collect()
    }

    /// All records of every section with the given name, concatenated
    pub fn records_in(&self, name: &str) -> Vec<Record<'a>> {
        self.sections_named(name)
            .iter()
            .flat_map(|s| s.records())
            .collect()
    }

    /// Scan once and report framing problems
    pub fn structure_notifications(&self) -> NotificationCollection {
        let mut notifications = NotificationCollection::new();
        self.scan(Some(&mut notifications));
        notifications
    }

    fn scan(&self, mut notes: Option<&mut NotificationCollection>) -> Vec<Section<'a>> {
        let tags = self.tags;
        let mut sections = Vec::new();
        let mut state = SectionState::Outside;

        let mut note = |line: u32, message: String| {
            trace!(line, %message, "section framing");
            if let Some(n) = notes.as_deref_mut() {
                n.notify_at(NotificationType::StructureMismatch, line, message);
            }
        };

        for (i, tag) in tags.iter().enumerate() {
            state = match state {
                SectionState::Finished => break,
                SectionState::Outside => {
                    if tag.is_marker("SECTION") {
                        SectionState::AwaitingName { line: tag.line }
                    } else if tag.is_marker("EOF") {
                        SectionState::Finished
                    } else {
                        if tag.is_marker("ENDSEC") {
                            note(tag.line, "ENDSEC without open SECTION".to_string());
                        }
                        SectionState::Outside
                    }
                }
                SectionState::AwaitingName { line } => {
                    if tag.code == 2 {
                        SectionState::Inside {
                            name: tag.text().trim().to_string(),
                            start: i + 1,
                            line,
                        }
                    } else if tag.is_marker("SECTION") {
                        note(line, "SECTION without name".to_string());
                        SectionState::AwaitingName { line: tag.line }
                    } else {
                        note(line, "SECTION without name".to_string());
                        SectionState::Outside
                    }
                }
                SectionState::Inside { name, start, line } => {
                    if tag.is_marker("ENDSEC") || tag.is_marker("EOF") || tag.is_marker("SECTION") {
                        if let Some(section) = section_at(tags, start, i, line) {
                            sections.push(section);
                        }
                        if tag.is_marker("SECTION") {
                            note(tag.line, format!("SECTION opened inside {name}"));
                            SectionState::AwaitingName { line: tag.line }
                        } else if tag.is_marker("EOF") {
                            note(tag.line, format!("EOF inside open section {name}"));
                            SectionState::Finished
                        } else {
                            SectionState::Outside
                        }
                    } else {
                        SectionState::Inside { name, start, line }
                    }
                }
            };
        }

        if let SectionState::Inside { name, start, line } = state {
            note(line, format!("section {name} not closed"));
            if let Some(section) = section_at(tags, start, tags.len(), line) {
                sections.push(section);
            }
        }
        sections
    }
}

fn section_at(tags: &[Tag], start: usize, end: usize, line: u32) -> Option<Section<'_>> {
    let name = tags.get(start.checked_sub(1)?)?.as_str()?.trim();
    Some(Section {
        name,
        tags: &tags[start..end],
        line,
    })
}
