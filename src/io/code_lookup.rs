//! Multi-valued group code lookup for one record

use ahash::AHashMap;

use super::tag::Tag;
use crate::types::{Handle, Vector2, Vector3};

/// Group code → ordered tag list for a single record.
///
/// Built once per record and queried by every field decoder. Values keep
/// their stream order so repeated codes (vertices, dash lengths, handles)
/// can be read back in sequence.
#[derive(Debug, Clone)]
pub struct CodeLookup<'a> {
    tags: &'a [Tag],
    index: AHashMap<i32, Vec<usize>>,
}

impl<'a> CodeLookup<'a> {
    /// Index a tag run
    pub fn new(tags: &'a [Tag]) -> Self {
        let mut index: AHashMap<i32, Vec<usize>> = AHashMap::with_capacity(tags.len());
        for (i, tag) in tags.iter().enumerate() {
            index.entry(tag.code).or_default().push(i);
        }
        Self { tags, index }
    }

    /// The underlying tag run
    pub fn tags(&self) -> &'a [Tag] {
        self.tags
    }

    /// Check whether a code occurs at least once
    pub fn has(&self, code: i32) -> bool {
        self.index.contains_key(&code)
    }

    /// Number of occurrences of a code
    pub fn count(&self, code: i32) -> usize {
        self.index.get(&code).map_or(0, Vec::len)
    }

    /// First tag with the code
    pub fn first(&self, code: i32) -> Option<&'a Tag> {
        let tags = self.tags;
        self.index
            .get(&code)
            .and_then(|ix| ix.first())
            .map(|&i| &tags[i])
    }

    /// Last tag with the code
    pub fn last(&self, code: i32) -> Option<&'a Tag> {
        let tags = self.tags;
        self.index
            .get(&code)
            .and_then(|ix| ix.last())
            .map(|&i| &tags[i])
    }

    /// Every tag with the code, in stream order
    pub fn all(&self, code: i32) -> impl Iterator<Item = &'a Tag> + '_ {
        let tags = self.tags;
        self.index
            .get(&code)
            .into_iter()
            .flat_map(move |ix| ix.iter().map(move |&i| &tags[i]))
    }

    /// First value as borrowed text
    pub fn str(&self, code: i32) -> Option<&'a str> {
        self.first(code).and_then(Tag::as_str)
    }

    /// First value as owned text, ignoring blank values
    pub fn string(&self, code: i32) -> Option<String> {
        self.first(code)
            .map(|t| t.text().into_owned())
            .filter(|s| !s.trim().is_empty())
    }

    /// Every value as owned text
    pub fn strings(&self, code: i32) -> Vec<String> {
        self.all(code).map(|t| t.text().into_owned()).collect()
    }

    pub fn f64(&self, code: i32) -> Option<f64> {
        self.first(code).and_then(Tag::as_f64)
    }

    pub fn f64_or(&self, code: i32, default: f64) -> f64 {
        self.f64(code).unwrap_or(default)
    }

    /// Every parseable value as f64
    pub fn f64s(&self, code: i32) -> Vec<f64> {
        self.all(code).filter_map(Tag::as_f64).collect()
    }

    pub fn i64(&self, code: i32) -> Option<i64> {
        self.first(code).and_then(Tag::as_i64)
    }

    pub fn i32(&self, code: i32) -> Option<i32> {
        self.first(code).and_then(Tag::as_i32)
    }

    pub fn i16(&self, code: i32) -> Option<i16> {
        self.first(code).and_then(Tag::as_i16)
    }

    pub fn i16_or(&self, code: i32, default: i16) -> i16 {
        self.i16(code).unwrap_or(default)
    }

    pub fn bool(&self, code: i32) -> Option<bool> {
        self.first(code).and_then(Tag::as_bool)
    }

    pub fn handle(&self, code: i32) -> Option<Handle> {
        self.first(code).and_then(Tag::as_handle)
    }

    /// Every parseable handle under any of the codes, in stream order
    pub fn handles(&self, codes: &[i32]) -> Vec<Handle> {
        self.tags
            .iter()
            .filter(|t| codes.contains(&t.code))
            .filter_map(Tag::as_handle)
            .collect()
    }

    /// Point from `x_code`, `x_code + 10`, `x_code + 20`.
    ///
    /// X and Y are required; a missing Z is 0.
    pub fn point3(&self, x_code: i32) -> Option<Vector3> {
        let x = self.f64(x_code)?;
        let y = self.f64(x_code + 10)?;
        let z = self.f64(x_code + 20).unwrap_or(0.0);
        Some(Vector3::new(x, y, z))
    }

    pub fn point3_or(&self, x_code: i32, default: Vector3) -> Vector3 {
        self.point3(x_code).unwrap_or(default)
    }

    /// Point from `x_code` and `x_code + 10`
    pub fn point2(&self, x_code: i32) -> Option<Vector2> {
        let x = self.f64(x_code)?;
        let y = self.f64(x_code + 10)?;
        Some(Vector2::new(x, y))
    }

    /// Extrusion direction (210/220/230), defaulting to +Z
    pub fn extrusion(&self) -> Vector3 {
        self.point3(210)
            .map(|v| v.normalize_or(Vector3::UNIT_Z))
            .unwrap_or(Vector3::UNIT_Z)
    }
}

/// Collect every point of a repeated `x`/`y`/`z` code run in stream order.
///
/// A new point starts on each `x_code`; Y and Z fill the current point.
pub fn collect_points(tags: &[Tag], x_code: i32) -> Vec<Vector3> {
    let mut points = Vec::new();
    let mut current: Option<Vector3> = None;
    for tag in tags {
        if tag.code == x_code {
            if let Some(p) = current.take() {
                points.push(p);
            }
            current = Some(Vector3::new(tag.as_f64().unwrap_or(0.0), 0.0, 0.0));
        } else if tag.code == x_code + 10 {
            if let Some(p) = current.as_mut() {
                p.y = tag.as_f64().unwrap_or(0.0);
            }
        } else if tag.code == x_code + 20 {
            if let Some(p) = current.as_mut() {
                p.z = tag.as_f64().unwrap_or(0.0);
            }
        }
    }
    if let Some(p) = current {
        points.push(p);
    }
    points
}

/// Owner handle: the first 330 outside any `102 {...}` application group
pub fn owner_handle(tags: &[Tag]) -> Option<Handle> {
    let mut in_group = false;
    for tag in tags {
        if tag.code == 102 {
            in_group = tag.text().trim_start().starts_with('{');
            continue;
        }
        if tag.code == 330 && !in_group {
            if let Some(h) = tag.as_handle() {
                return Some(h);
            }
        }
    }
    None
}

/// Handles listed inside a `102 {<group>` ... `102 }` application group
pub fn group_handles(tags: &[Tag], group: &str) -> Vec<Handle> {
    let mut inside = false;
    let mut handles = Vec::new();
    for tag in tags {
        if tag.code == 102 {
            let text = tag.text();
            let text = text.trim();
            inside = text.starts_with('{') && text[1..].eq_ignore_ascii_case(group);
            continue;
        }
        if inside && (330..=369).contains(&tag.code) {
            handles.extend(tag.as_handle());
        }
    }
    handles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (c, v))| Tag::from_raw(*c, v, i as u32 * 2 + 1))
            .collect()
    }

    #[test]
    fn test_multi_valued() {
        let t = tags(&[(49, "1.0"), (49, "-0.5"), (8, "Walls"), (49, "0.25")]);
        let lookup = CodeLookup::new(&t);
        assert_eq!(lookup.f64s(49), vec![1.0, -0.5, 0.25]);
        assert_eq!(lookup.count(49), 3);
        assert_eq!(lookup.str(8), Some("Walls"));
        assert_eq!(lookup.last(49).and_then(Tag::as_f64), Some(0.25));
        assert!(!lookup.has(62));
    }

    #[test]
    fn test_points() {
        let t = tags(&[(10, "1"), (20, "2"), (11, "4"), (21, "5"), (31, "6")]);
        let lookup = CodeLookup::new(&t);
        assert_eq!(lookup.point3(10), Some(Vector3::new(1.0, 2.0, 0.0)));
        assert_eq!(lookup.point3(11), Some(Vector3::new(4.0, 5.0, 6.0)));
        assert_eq!(lookup.point3(12), None);
        assert_eq!(lookup.extrusion(), Vector3::UNIT_Z);
    }

    #[test]
    fn test_collect_points() {
        let t = tags(&[(10, "0"), (20, "0"), (10, "1"), (20, "0"), (30, "2"), (10, "1")]);
        let points = collect_points(&t, 10);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Vector3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_owner_skips_reactor_group() {
        let t = tags(&[
            (102, "{ACAD_REACTORS"),
            (330, "1F"),
            (102, "}"),
            (102, "{ACAD_XDICTIONARY"),
            (360, "2A"),
            (102, "}"),
            (330, "2"),
        ]);
        assert_eq!(owner_handle(&t), Some(Handle::new(2)));
        assert_eq!(group_handles(&t, "ACAD_REACTORS"), vec![Handle::new(0x1F)]);
        assert_eq!(group_handles(&t, "ACAD_XDICTIONARY"), vec![Handle::new(0x2A)]);
    }

    #[test]
    fn test_handles_in_order() {
        let t = tags(&[(331, "A"), (8, "0"), (361, "b"), (330, "zz")]);
        let lookup = CodeLookup::new(&t);
        assert_eq!(
            lookup.handles(&[330, 331, 361]),
            vec![Handle::new(0xA), Handle::new(0xB)]
        );
    }
}
