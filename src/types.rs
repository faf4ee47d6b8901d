//! Core planet types and constants shared by interaction, UI and rendering.

use std::fmt;

/// Mean diameter of Earth in kilometers (reference for relative sizes).
pub const EARTH_DIAMETER_KM: f64 = 12742.0;

/// Days in a Julian year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Hours per day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Default divisor applied to radii when sizing planets for rendering.
pub const DEFAULT_SIZE_SCALE: f64 = 1000.0;

/// Default multiplier applied to AU when placing planets for rendering.
pub const DEFAULT_DISTANCE_SCALE: f64 = 10.0;

/// Opaque handle to a renderable planet owned by the scene.
///
/// The interaction layer only looks handles up by planet name; it never
/// controls the lifetime of whatever the handle refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanetHandle(pub u64);

/// Classification of a celestial body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlanetType {
    #[default]
    Terrestrial,
    GasGiant,
    IceGiant,
    DwarfPlanet,
}

impl PlanetType {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PlanetType::Terrestrial => "Terrestrial Planet",
            PlanetType::GasGiant => "Gas Giant",
            PlanetType::IceGiant => "Ice Giant",
            PlanetType::DwarfPlanet => "Dwarf Planet",
        }
    }
}

/// Validation failures for planet records.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlanetDataError {
    #[error("planet record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("planet `{planet}` has non-finite `{field}` ({value})")]
    NonFinite {
        planet: String,
        field: &'static str,
        value: f64,
    },

    #[error("invalid hex color `{0}`")]
    InvalidColor(String),
}

/// Descriptive record for a planet (or the Sun).
///
/// Immutable once loaded. Distances are in AU, diameters in km, masses in
/// Earth masses, orbital periods in days and rotation periods in hours
/// (negative rotation means retrograde).
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetData {
    pub name: String,
    pub display_order: u32,
    pub planet_type: PlanetType,
    pub distance_from_sun: f64,
    pub diameter: f64,
    pub mass: Option<f64>,
    pub orbital_period: f64,
    pub orbital_eccentricity: f64,
    pub rotation_period: f64,
    pub axial_tilt: f64,
    pub composition: String,
    pub atmosphere: String,
    pub color: [u8; 3],
    pub albedo: f64,
    pub is_dwarf_planet: bool,
    pub has_rings: bool,
    pub has_moons: bool,
    pub moon_count: u32,
}

impl Default for PlanetData {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_order: 0,
            planet_type: PlanetType::Terrestrial,
            distance_from_sun: 1.0,
            diameter: EARTH_DIAMETER_KM,
            mass: None,
            orbital_period: DAYS_PER_YEAR,
            orbital_eccentricity: 0.0,
            rotation_period: HOURS_PER_DAY,
            axial_tilt: 0.0,
            composition: String::new(),
            atmosphere: String::new(),
            color: [0x88, 0x88, 0x88],
            albedo: 0.3,
            is_dwarf_planet: false,
            has_rings: false,
            has_moons: false,
            moon_count: 0,
        }
    }
}

impl PlanetData {
    /// Create a record with the given name and default physical values.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check required fields are present and numeric fields are finite.
    pub fn validate(&self) -> Result<(), PlanetDataError> {
        if self.name.trim().is_empty() {
            return Err(PlanetDataError::MissingField("name"));
        }

        let fields = [
            ("distance_from_sun", self.distance_from_sun),
            ("diameter", self.diameter),
            ("orbital_period", self.orbital_period),
            ("orbital_eccentricity", self.orbital_eccentricity),
            ("rotation_period", self.rotation_period),
            ("axial_tilt", self.axial_tilt),
            ("albedo", self.albedo),
        ];
        let mass = self.mass.map(|m| ("mass", m));

        for (field, value) in fields.into_iter().chain(mass) {
            if !value.is_finite() {
                return Err(PlanetDataError::NonFinite {
                    planet: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        Ok(())
    }

    /// Orbital period in Earth years, rounded to two decimals.
    pub fn orbital_period_years(&self) -> f64 {
        round2(self.orbital_period / DAYS_PER_YEAR)
    }

    /// Rotation period in Earth days, rounded to two decimals.
    pub fn rotation_period_days(&self) -> f64 {
        round2(self.rotation_period / HOURS_PER_DAY)
    }

    /// Diameter relative to Earth, rounded to two decimals.
    pub fn diameter_earth_relative(&self) -> f64 {
        round2(self.diameter / EARTH_DIAMETER_KM)
    }

    /// Radius scaled down for rendering; never smaller than 0.1.
    pub fn scaled_size(&self, scale_factor: f64) -> f64 {
        ((self.diameter / 2.0) / scale_factor).max(0.1)
    }

    /// Orbital distance scaled for rendering; never closer than 1.0.
    pub fn scaled_distance(&self, scale_factor: f64) -> f64 {
        (self.distance_from_sun * scale_factor).max(1.0)
    }

    /// Color as normalized sRGB components.
    pub fn color_srgb(&self) -> [f32; 3] {
        self.color.map(|c| c as f32 / 255.0)
    }
}

impl fmt::Display for PlanetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.planet_type.label())
    }
}

/// Parse a `#RRGGBB` color string.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3], PlanetDataError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(PlanetDataError::InvalidColor(hex.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| PlanetDataError::InvalidColor(hex.to_string()))
    };

    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_display_uses_type_label() {
        let mut earth = PlanetData::named("Earth");
        earth.planet_type = PlanetType::Terrestrial;
        assert_eq!(earth.to_string(), "Earth (Terrestrial Planet)");
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let planet = PlanetData::named("  ");
        assert_eq!(planet.validate(), Err(PlanetDataError::MissingField("name")));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut planet = PlanetData::named("Mars");
        planet.diameter = f64::NAN;
        assert!(matches!(
            planet.validate(),
            Err(PlanetDataError::NonFinite { field: "diameter", .. })
        ));

        let mut planet = PlanetData::named("Mars");
        planet.mass = Some(f64::INFINITY);
        assert!(matches!(
            planet.validate(),
            Err(PlanetDataError::NonFinite { field: "mass", .. })
        ));
    }

    #[test]
    fn test_derived_metrics() {
        let mut jupiter = PlanetData::named("Jupiter");
        jupiter.orbital_period = 4332.59;
        jupiter.rotation_period = 9.93;
        jupiter.diameter = 142984.0;
        jupiter.distance_from_sun = 5.204;

        assert_relative_eq!(jupiter.orbital_period_years(), 11.86, epsilon = 1e-9);
        assert_relative_eq!(jupiter.rotation_period_days(), 0.41, epsilon = 1e-9);
        assert_relative_eq!(jupiter.diameter_earth_relative(), 11.22, epsilon = 1e-9);
        assert_relative_eq!(jupiter.scaled_size(DEFAULT_SIZE_SCALE), 71.492, epsilon = 1e-9);
        assert_relative_eq!(jupiter.scaled_distance(DEFAULT_DISTANCE_SCALE), 52.04, epsilon = 1e-9);
    }

    #[test]
    fn test_scaled_values_have_minimums() {
        let mut tiny = PlanetData::named("Speck");
        tiny.diameter = 10.0;
        tiny.distance_from_sun = 0.01;
        assert_eq!(tiny.scaled_size(DEFAULT_SIZE_SCALE), 0.1);
        assert_eq!(tiny.scaled_distance(DEFAULT_DISTANCE_SCALE), 1.0);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#4F94CD"), Ok([0x4F, 0x94, 0xCD]));
        assert_eq!(parse_hex_color("fdb813"), Ok([0xFD, 0xB8, 0x13]));
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#GG0000").is_err());
    }
}
