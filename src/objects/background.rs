//! BACKGROUND objects
//!
//! A background record carries one concrete subclass region after the
//! generic `AcDbBackground` marker. The decoder walks the record once and
//! switches interpretation on each code-100 marker.

use crate::io::{owner_handle, CodeLookup, Tag};
use crate::types::{Color, Handle};

/// Subclass region currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSubclass {
    None,
    Solid,
    Gradient,
    Image,
    Sky,
    GroundPlane,
    Ibl,
    Other,
}

impl BackgroundSubclass {
    fn from_marker(marker: &str) -> Self {
        match marker.trim().to_ascii_uppercase().as_str() {
            "ACDBSOLIDBACKGROUND" => BackgroundSubclass::Solid,
            "ACDBGRADIENTBACKGROUND" => BackgroundSubclass::Gradient,
            "ACDBIMAGEBACKGROUND" => BackgroundSubclass::Image,
            "ACDBSKYBACKGROUND" => BackgroundSubclass::Sky,
            "ACDBGROUNDPLANEBACKGROUND" => BackgroundSubclass::GroundPlane,
            "ACDBIBLBACKGROUND" => BackgroundSubclass::Ibl,
            "ACDBBACKGROUND" => BackgroundSubclass::None,
            _ => BackgroundSubclass::Other,
        }
    }
}

/// Decoded background payload
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BackgroundKind {
    #[default]
    Unknown,
    Solid {
        color: Color,
    },
    Gradient {
        top: Color,
        middle: Color,
        bottom: Color,
        horizon: f64,
        height: f64,
        rotation: f64,
    },
    Image {
        file: Option<String>,
        fit_to_screen: bool,
        maintain_aspect: bool,
        use_tiling: bool,
        offset: (f64, f64),
        scale: (f64, f64),
    },
    Sky {
        sun: Option<Handle>,
    },
    GroundPlane {
        sky_zenith: Color,
        sky_horizon: Color,
        underground_horizon: Color,
        underground_azimuth: Color,
        near_ground: Color,
        far_ground: Color,
    },
    ImageBasedLighting {
        enabled: bool,
        image: Option<String>,
        rotation: f64,
        display_image: bool,
        secondary_background: Option<Handle>,
    },
}

/// A viewport/view background
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Background {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Class version (90 in AcDbBackground)
    pub version: i32,
    /// Name from the `ACAD_BACKGROUND` dictionary, filled in by the builder
    pub name: Option<String>,
    pub kind: BackgroundKind,
}

fn packed(tag: &Tag) -> Color {
    tag.as_i64().map(Color::from_true_color).unwrap_or_default()
}

impl Background {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let mut state = BackgroundSubclass::None;
        let mut kind = BackgroundKind::Unknown;
        let mut version = 1;
        // the IBL region repeats 290: enable first, display second
        let mut seen_290 = 0usize;

        for tag in lookup.tags() {
            if tag.code == 100 {
                state = BackgroundSubclass::from_marker(&tag.text());
                seen_290 = 0;
                kind = match state {
                    BackgroundSubclass::Solid => BackgroundKind::Solid {
                        color: Color::default(),
                    },
                    BackgroundSubclass::Gradient => BackgroundKind::Gradient {
                        top: Color::default(),
                        middle: Color::default(),
                        bottom: Color::default(),
                        horizon: 0.5,
                        height: 0.33,
                        rotation: 0.0,
                    },
                    BackgroundSubclass::Image => BackgroundKind::Image {
                        file: None,
                        fit_to_screen: false,
                        maintain_aspect: false,
                        use_tiling: false,
                        offset: (0.0, 0.0),
                        scale: (1.0, 1.0),
                    },
                    BackgroundSubclass::Sky => BackgroundKind::Sky { sun: None },
                    BackgroundSubclass::GroundPlane => BackgroundKind::GroundPlane {
                        sky_zenith: Color::default(),
                        sky_horizon: Color::default(),
                        underground_horizon: Color::default(),
                        underground_azimuth: Color::default(),
                        near_ground: Color::default(),
                        far_ground: Color::default(),
                    },
                    BackgroundSubclass::Ibl => BackgroundKind::ImageBasedLighting {
                        enabled: false,
                        image: None,
                        rotation: 0.0,
                        display_image: false,
                        secondary_background: None,
                    },
                    BackgroundSubclass::None | BackgroundSubclass::Other => kind,
                };
                continue;
            }

            match (&mut kind, state) {
                (_, BackgroundSubclass::None) if tag.code == 90 => {
                    version = tag.as_i32().unwrap_or(1);
                }
                (BackgroundKind::Solid { color }, BackgroundSubclass::Solid) => {
                    if tag.code == 90 {
                        *color = packed(tag);
                    }
                }
                (
                    BackgroundKind::Gradient {
                        top,
                        middle,
                        bottom,
                        horizon,
                        height,
                        rotation,
                    },
                    BackgroundSubclass::Gradient,
                ) => match tag.code {
                    90 => *top = packed(tag),
                    91 => *middle = packed(tag),
                    92 => *bottom = packed(tag),
                    140 => *horizon = tag.as_f64().unwrap_or(*horizon),
                    141 => *height = tag.as_f64().unwrap_or(*height),
                    142 => *rotation = tag.as_f64().unwrap_or(*rotation),
                    _ => {}
                },
                (
                    BackgroundKind::Image {
                        file,
                        fit_to_screen,
                        maintain_aspect,
                        use_tiling,
                        offset,
                        scale,
                    },
                    BackgroundSubclass::Image,
                ) => match tag.code {
                    300 => *file = Some(tag.text().into_owned()),
                    290 => *fit_to_screen = tag.as_bool().unwrap_or(false),
                    291 => *maintain_aspect = tag.as_bool().unwrap_or(false),
                    292 => *use_tiling = tag.as_bool().unwrap_or(false),
                    140 => offset.0 = tag.as_f64().unwrap_or(0.0),
                    141 => offset.1 = tag.as_f64().unwrap_or(0.0),
                    142 => scale.0 = tag.as_f64().unwrap_or(1.0),
                    143 => scale.1 = tag.as_f64().unwrap_or(1.0),
                    _ => {}
                },
                (BackgroundKind::Sky { sun }, BackgroundSubclass::Sky) => {
                    if tag.code == 340 {
                        *sun = tag.as_handle();
                    }
                }
                (
                    BackgroundKind::GroundPlane {
                        sky_zenith,
                        sky_horizon,
                        underground_horizon,
                        underground_azimuth,
                        near_ground,
                        far_ground,
                    },
                    BackgroundSubclass::GroundPlane,
                ) => match tag.code {
                    90 => *sky_zenith = packed(tag),
                    91 => *sky_horizon = packed(tag),
                    92 => *underground_horizon = packed(tag),
                    93 => *underground_azimuth = packed(tag),
                    94 => *near_ground = packed(tag),
                    95 => *far_ground = packed(tag),
                    _ => {}
                },
                (
                    BackgroundKind::ImageBasedLighting {
                        enabled,
                        image,
                        rotation,
                        display_image,
                        secondary_background,
                    },
                    BackgroundSubclass::Ibl,
                ) => match tag.code {
                    290 => {
                        let value = tag.as_bool().unwrap_or(false);
                        if seen_290 == 0 {
                            *enabled = value;
                        } else {
                            *display_image = value;
                        }
                        seen_290 += 1;
                    }
                    1 => *image = Some(tag.text().into_owned()),
                    40 => *rotation = tag.as_f64().unwrap_or(0.0),
                    340 => *secondary_background = tag.as_handle(),
                    _ => {}
                },
                _ => {}
            }
        }

        Background {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            version,
            name: None,
            kind,
        }
    }
}
