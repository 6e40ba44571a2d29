//! IMAGEDEF, IMAGEDEF_REACTOR and RASTERVARIABLES objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::{Handle, Vector2};

/// Raster image file referenced by IMAGE entities
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageDefinition {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// File path (1)
    pub file_path: String,
    /// Image size in pixels (10, 20)
    pub size_pixels: Vector2,
    /// Default size of one pixel in drawing units (11, 21)
    pub pixel_size: Vector2,
    /// Whether the image is loaded (280)
    pub loaded: bool,
    /// Resolution units (281): 0 = none, 2 = cm, 5 = inch
    pub resolution_units: i16,
}

impl ImageDefinition {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        ImageDefinition {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            file_path: lookup.string(1).unwrap_or_default(),
            size_pixels: lookup.point2(10).unwrap_or_default(),
            pixel_size: lookup.point2(11).unwrap_or(Vector2::new(1.0, 1.0)),
            loaded: lookup.bool(280).unwrap_or(true),
            resolution_units: lookup.i16_or(281, 0),
        }
    }

    /// File name without directories
    pub fn file_name(&self) -> &str {
        self.file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_path)
    }
}

/// Back-link from an image definition to one IMAGE entity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageDefinitionReactor {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Class version (90)
    pub version: i32,
}

impl ImageDefinitionReactor {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        ImageDefinitionReactor {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            version: lookup.i32(90).unwrap_or(2),
        }
    }
}

/// Drawing-wide raster display settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RasterVariables {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Show image frames (70)
    pub frame_display: bool,
    /// Display quality (71): 0 = draft, 1 = high
    pub quality: i16,
    /// Units (72)
    pub units: i16,
}

impl RasterVariables {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        RasterVariables {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            frame_display: lookup.bool(70).unwrap_or(true),
            quality: lookup.i16_or(71, 1),
            units: lookup.i16_or(72, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_image_definition() {
        let t: Vec<Tag> = [
            (5, "60"),
            (330, "5F"),
            (100, "AcDbRasterImageDef"),
            (90, "0"),
            (1, "C:\\maps\\site.png"),
            (10, "640"),
            (20, "480"),
            (11, "0.5"),
            (21, "0.5"),
            (280, "1"),
            (281, "0"),
        ]
        .iter()
        .map(|(c, v)| Tag::from_raw(*c, v, 0))
        .collect();
        let def = ImageDefinition::decode(&CodeLookup::new(&t), 1);
        assert_eq!(def.file_name(), "site.png");
        assert_eq!(def.size_pixels, Vector2::new(640.0, 480.0));
        assert!(def.loaded);
    }
}
