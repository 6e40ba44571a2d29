//! AutoCAD insertion-unit codes ($INSUNITS, BLOCK_RECORD code 70)

/// Metres per unit for every AutoCAD unit code, indexed by code.
///
/// Code 0 (unitless) maps to 1 so that unitless geometry is never rescaled.
pub const UNIT_TO_METERS: [f64; 22] = [
    1.0,                     // 0 unitless
    0.0254,                  // 1 inches
    0.3048,                  // 2 feet
    1609.344,                // 3 miles
    0.001,                   // 4 millimeters
    0.01,                    // 5 centimeters
    1.0,                     // 6 meters
    1000.0,                  // 7 kilometers
    2.54e-8,                 // 8 microinches
    2.54e-5,                 // 9 mils
    0.9144,                  // 10 yards
    1e-10,                   // 11 angstroms
    1e-9,                    // 12 nanometers
    1e-6,                    // 13 microns
    0.1,                     // 14 decimeters
    10.0,                    // 15 decameters
    100.0,                   // 16 hectometers
    1e9,                     // 17 gigameters
    1.495_978_707e11,        // 18 astronomical units
    9.460_730_472_580_8e15,  // 19 light years
    3.085_677_581_491_367e16, // 20 parsecs
    0.304_800_609_601_219_2, // 21 US survey feet
];

const UNIT_NAMES: [&str; 22] = [
    "unitless",
    "inches",
    "feet",
    "miles",
    "millimeters",
    "centimeters",
    "meters",
    "kilometers",
    "microinches",
    "mils",
    "yards",
    "angstroms",
    "nanometers",
    "microns",
    "decimeters",
    "decameters",
    "hectometers",
    "gigameters",
    "astronomical units",
    "light years",
    "parsecs",
    "US survey feet",
];

/// Metres per unit, `None` for codes outside the table
pub fn unit_to_meters(code: i16) -> Option<f64> {
    usize::try_from(code).ok().and_then(|i| UNIT_TO_METERS.get(i).copied())
}

/// Human-readable unit name
pub fn unit_name(code: i16) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|i| UNIT_NAMES.get(i).copied())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_table_bounds() {
        assert_eq!(unit_to_meters(0), Some(1.0));
        assert_eq!(unit_to_meters(4), Some(0.001));
        assert_eq!(unit_to_meters(21), Some(0.3048006096012192));
        assert_eq!(unit_to_meters(22), None);
        assert_eq!(unit_to_meters(-1), None);
    }

    #[test]
    fn test_unit_names() {
        assert_eq!(unit_name(6), "meters");
        assert_eq!(unit_name(99), "unknown");
    }
}
