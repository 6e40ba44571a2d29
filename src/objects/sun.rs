//! SUN objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::{Color, Handle};

/// Sun light attached to a viewport or view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sun {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Class version (90)
    pub version: i32,
    /// On/off (290)
    pub enabled: bool,
    /// Color (63 / 421)
    pub color: Color,
    /// Intensity (40)
    pub intensity: f64,
    /// Shadows on (291)
    pub shadows: bool,
    /// Julian day (91)
    pub julian_day: i32,
    /// Seconds past midnight (92)
    pub seconds_past_midnight: i32,
    /// Daylight saving (292)
    pub daylight_saving: bool,
    /// Shadow type (70): 0 = ray traced, 1 = shadow maps
    pub shadow_type: i16,
    /// Shadow map size (71)
    pub shadow_map_size: i16,
    /// Shadow softness (280)
    pub shadow_softness: i16,
}

impl Sun {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        Sun {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            version: lookup.i32(90).unwrap_or(1),
            enabled: lookup.bool(290).unwrap_or(false),
            color: Color::resolve(lookup.i16(63), lookup.i64(421)),
            intensity: lookup.f64_or(40, 1.0),
            shadows: lookup.bool(291).unwrap_or(false),
            julian_day: lookup.i32(91).unwrap_or(0),
            seconds_past_midnight: lookup.i32(92).unwrap_or(0),
            daylight_saving: lookup.bool(292).unwrap_or(false),
            shadow_type: lookup.i16_or(70, 0),
            shadow_map_size: lookup.i16_or(71, 256),
            shadow_softness: lookup.i16_or(280, 1),
        }
    }

    /// Local time of day as (hours, minutes, seconds)
    pub fn time_of_day(&self) -> (u32, u32, u32) {
        let secs = self.seconds_past_midnight.clamp(0, 86_399) as u32;
        (secs / 3600, secs / 60 % 60, secs % 60)
    }
}
