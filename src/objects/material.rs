//! MATERIAL objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

/// A material channel: override method, factor, packed color and map file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialChannel {
    /// 0 = use current color, 1 = override
    pub color_method: Option<i16>,
    pub factor: Option<f64>,
    /// Packed RGB color value
    pub color: Option<i64>,
    pub map_blend: Option<f64>,
    pub map_file: Option<String>,
}

impl MaterialChannel {
    fn read(lookup: &CodeLookup<'_>, codes: [i32; 5]) -> Self {
        let [method, factor, color, blend, file] = codes;
        MaterialChannel {
            color_method: lookup.i16(method),
            factor: lookup.f64(factor),
            color: lookup.i64(color),
            map_blend: lookup.f64(blend),
            map_file: lookup.string(file),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == MaterialChannel::default()
    }
}

/// A render material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Material name (1)
    pub name: String,
    /// Description (2)
    pub description: Option<String>,
    pub ambient: MaterialChannel,
    pub diffuse: MaterialChannel,
    pub specular: MaterialChannel,
    /// Specular gloss factor (44)
    pub gloss: Option<f64>,
    /// Reflection map blend (46) and file (6)
    pub reflection_blend: Option<f64>,
    pub reflection_map: Option<String>,
    /// Opacity percent (140) and map (7)
    pub opacity: Option<f64>,
    pub opacity_map: Option<String>,
    /// Bump map blend (143) and file (8)
    pub bump_blend: Option<f64>,
    pub bump_map: Option<String>,
    /// Refraction index (145) and map (9)
    pub refraction_index: Option<f64>,
    pub refraction_map: Option<String>,
    /// Translucence (148)
    pub translucence: Option<f64>,
    /// Self illumination (149)
    pub self_illumination: Option<f64>,
    /// Reflectivity (468)
    pub reflectivity: Option<f64>,
    /// Illumination model (93)
    pub illumination_model: Option<i32>,
    /// Channel flags (94)
    pub channel_flags: Option<i32>,
}

impl Material {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        Material {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            name: lookup.string(1).unwrap_or_default(),
            description: lookup.string(2),
            // ambient has no map
            ambient: MaterialChannel::read(lookup, [70, 40, 90, -1, -1]),
            diffuse: MaterialChannel::read(lookup, [71, 41, 91, 42, 3]),
            specular: MaterialChannel::read(lookup, [73, 45, 92, 47, 4]),
            gloss: lookup.f64(44),
            reflection_blend: lookup.f64(46),
            reflection_map: lookup.string(6),
            opacity: lookup.f64(140),
            opacity_map: lookup.string(7),
            bump_blend: lookup.f64(143),
            bump_map: lookup.string(8),
            refraction_index: lookup.f64(145),
            refraction_map: lookup.string(9),
            translucence: lookup.f64(148),
            self_illumination: lookup.f64(149),
            reflectivity: lookup.f64(468),
            illumination_model: lookup.i32(93),
            channel_flags: lookup.i32(94),
        }
    }

    /// Every texture file the material references
    pub fn map_files(&self) -> Vec<&str> {
        [
            &self.diffuse.map_file,
            &self.specular.map_file,
            &self.reflection_map,
            &self.opacity_map,
            &self.bump_map,
            &self.refraction_map,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect()
    }
}
